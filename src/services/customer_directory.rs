use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::customer::{
    Contract, CustomerProfile, Gender, InternetAddon, InternetService, MultipleLines,
    PaymentMethod, YesNo,
};

/// One looked-up sample customer. Selecting it replaces the whole session
/// profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub profile: CustomerProfile,
}

/// Fixed in-memory list of sample customers, filtered by case-insensitive
/// substring match against name or id. No pagination, no ranking beyond
/// list order.
pub struct CustomerDirectory {
    records: Vec<CustomerRecord>,
}

impl CustomerDirectory {
    pub fn with_sample_records() -> Self {
        Self {
            records: sample_records(),
        }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    /// At most the matching subset. An empty or whitespace-only query returns
    /// nothing, not the full list.
    pub fn lookup(&self, query: &str) -> Vec<&CustomerRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let matches: Vec<&CustomerRecord> = self
            .records
            .iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record.id.to_lowercase().contains(&needle)
            })
            .collect();

        debug!(
            target: "app::directory",
            query = %needle,
            match_count = matches.len(),
            "customer lookup"
        );

        matches
    }
}

impl Default for CustomerDirectory {
    fn default() -> Self {
        Self::with_sample_records()
    }
}

fn sample_records() -> Vec<CustomerRecord> {
    vec![
        CustomerRecord {
            id: "CUST-8231".to_string(),
            name: "Alex Johnson".to_string(),
            profile: CustomerProfile {
                gender: Gender::Male,
                senior_citizen: 0,
                partner: YesNo::No,
                dependents: YesNo::No,
                tenure: 3,
                phone_service: YesNo::Yes,
                multiple_lines: MultipleLines::No,
                internet_service: InternetService::FiberOptic,
                online_security: InternetAddon::No,
                online_backup: InternetAddon::No,
                device_protection: InternetAddon::No,
                tech_support: InternetAddon::No,
                streaming_tv: InternetAddon::Yes,
                streaming_movies: InternetAddon::Yes,
                contract: Contract::MonthToMonth,
                paperless_billing: YesNo::Yes,
                payment_method: PaymentMethod::ElectronicCheck,
                monthly_charges: 95.70,
                total_charges: 287.10,
            },
        },
        CustomerRecord {
            id: "CUST-1047".to_string(),
            name: "Maria Delgado".to_string(),
            profile: CustomerProfile {
                gender: Gender::Female,
                senior_citizen: 0,
                partner: YesNo::Yes,
                dependents: YesNo::Yes,
                tenure: 58,
                phone_service: YesNo::Yes,
                multiple_lines: MultipleLines::Yes,
                internet_service: InternetService::Dsl,
                online_security: InternetAddon::Yes,
                online_backup: InternetAddon::Yes,
                device_protection: InternetAddon::Yes,
                tech_support: InternetAddon::Yes,
                streaming_tv: InternetAddon::No,
                streaming_movies: InternetAddon::No,
                contract: Contract::TwoYear,
                paperless_billing: YesNo::No,
                payment_method: PaymentMethod::BankTransfer,
                monthly_charges: 61.25,
                total_charges: 3552.50,
            },
        },
        CustomerRecord {
            id: "CUST-5590".to_string(),
            name: "Priya Natarajan".to_string(),
            profile: CustomerProfile {
                gender: Gender::Female,
                senior_citizen: 1,
                partner: YesNo::Yes,
                dependents: YesNo::No,
                tenure: 24,
                phone_service: YesNo::Yes,
                multiple_lines: MultipleLines::Yes,
                internet_service: InternetService::FiberOptic,
                online_security: InternetAddon::No,
                online_backup: InternetAddon::Yes,
                device_protection: InternetAddon::Yes,
                tech_support: InternetAddon::No,
                streaming_tv: InternetAddon::Yes,
                streaming_movies: InternetAddon::No,
                contract: Contract::OneYear,
                paperless_billing: YesNo::Yes,
                payment_method: PaymentMethod::CreditCard,
                monthly_charges: 104.80,
                total_charges: 2515.20,
            },
        },
        CustomerRecord {
            id: "CUST-3316".to_string(),
            name: "Daniel Okafor".to_string(),
            profile: CustomerProfile {
                gender: Gender::Male,
                senior_citizen: 0,
                partner: YesNo::No,
                dependents: YesNo::No,
                tenure: 1,
                phone_service: YesNo::No,
                multiple_lines: MultipleLines::NoPhoneService,
                internet_service: InternetService::Dsl,
                online_security: InternetAddon::No,
                online_backup: InternetAddon::No,
                device_protection: InternetAddon::No,
                tech_support: InternetAddon::No,
                streaming_tv: InternetAddon::No,
                streaming_movies: InternetAddon::No,
                contract: Contract::MonthToMonth,
                paperless_billing: YesNo::Yes,
                payment_method: PaymentMethod::MailedCheck,
                monthly_charges: 29.85,
                total_charges: 29.85,
            },
        },
        CustomerRecord {
            id: "CUST-7702".to_string(),
            name: "Susan Whitfield".to_string(),
            profile: CustomerProfile {
                gender: Gender::Female,
                senior_citizen: 1,
                partner: YesNo::No,
                dependents: YesNo::No,
                tenure: 70,
                phone_service: YesNo::Yes,
                multiple_lines: MultipleLines::No,
                internet_service: InternetService::No,
                online_security: InternetAddon::NoInternetService,
                online_backup: InternetAddon::NoInternetService,
                device_protection: InternetAddon::NoInternetService,
                tech_support: InternetAddon::NoInternetService,
                streaming_tv: InternetAddon::NoInternetService,
                streaming_movies: InternetAddon::NoInternetService,
                contract: Contract::TwoYear,
                paperless_billing: YesNo::No,
                payment_method: PaymentMethod::MailedCheck,
                monthly_charges: 19.95,
                total_charges: 1396.50,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_name_case_insensitively() {
        let directory = CustomerDirectory::with_sample_records();
        let matches = directory.lookup("alex");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "CUST-8231");
    }

    #[test]
    fn lookup_matches_id_substring() {
        let directory = CustomerDirectory::with_sample_records();
        let matches = directory.lookup("cust-55");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Priya Natarajan");
    }

    #[test]
    fn unmatched_query_returns_empty() {
        let directory = CustomerDirectory::with_sample_records();
        assert!(directory.lookup("CUST-99").is_empty());
    }

    #[test]
    fn empty_query_returns_empty_not_full_list() {
        let directory = CustomerDirectory::with_sample_records();
        assert!(directory.lookup("").is_empty());
        assert!(directory.lookup("   ").is_empty());
    }
}
