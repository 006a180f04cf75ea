pub use super::cached_carrier_countries::Entity as CachedCarrierCountries;
pub use super::cached_countries::Entity as CachedCountries;
pub use super::cached_ledger_accounts::Entity as CachedLedgerAccounts;
pub use super::cached_shipping_methods::Entity as CachedShippingMethods;
pub use super::cached_tax_rates::Entity as CachedTaxRates;
pub use super::country_mappings::Entity as CountryMappings;
pub use super::credit_notes::Entity as CreditNotes;
pub use super::customers::Entity as Customers;
pub use super::invoices::Entity as Invoices;
pub use super::mutations::Entity as Mutations;
pub use super::pick_tickets::Entity as PickTickets;
pub use super::shipping_method_countries::Entity as ShippingMethodCountries;
pub use super::tax_mappings::Entity as TaxMappings;
