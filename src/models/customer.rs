use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Gender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Female" => Ok(Gender::Female),
            "Male" => Ok(Gender::Male),
            other => Err(format!("unsupported gender value: {other}")),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Two-state flag used by most of the Telco columns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for YesNo {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Yes" => Ok(YesNo::Yes),
            "No" => Ok(YesNo::No),
            other => Err(format!("unsupported yes/no value: {other}")),
        }
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MultipleLines {
    Yes,
    No,
    #[serde(rename = "No phone service")]
    NoPhoneService,
}

impl MultipleLines {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultipleLines::Yes => "Yes",
            MultipleLines::No => "No",
            MultipleLines::NoPhoneService => "No phone service",
        }
    }
}

impl fmt::Display for MultipleLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MultipleLines {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Yes" => Ok(MultipleLines::Yes),
            "No" => Ok(MultipleLines::No),
            "No phone service" => Ok(MultipleLines::NoPhoneService),
            other => Err(format!("unsupported multiple-lines value: {other}")),
        }
    }
}

impl FromStr for MultipleLines {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InternetService {
    #[serde(rename = "DSL")]
    Dsl,
    #[serde(rename = "Fiber optic")]
    FiberOptic,
    No,
}

impl InternetService {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternetService::Dsl => "DSL",
            InternetService::FiberOptic => "Fiber optic",
            InternetService::No => "No",
        }
    }
}

impl fmt::Display for InternetService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InternetService {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DSL" => Ok(InternetService::Dsl),
            "Fiber optic" => Ok(InternetService::FiberOptic),
            "No" => Ok(InternetService::No),
            other => Err(format!("unsupported internet-service value: {other}")),
        }
    }
}

impl FromStr for InternetService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Add-on columns (security, backup, protection, support, streaming) share
/// this three-state shape. "No internet service" is only meaningful when
/// `internet_service` is `No`; that dependency is not validated here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InternetAddon {
    Yes,
    No,
    #[serde(rename = "No internet service")]
    NoInternetService,
}

impl InternetAddon {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternetAddon::Yes => "Yes",
            InternetAddon::No => "No",
            InternetAddon::NoInternetService => "No internet service",
        }
    }
}

impl fmt::Display for InternetAddon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InternetAddon {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Yes" => Ok(InternetAddon::Yes),
            "No" => Ok(InternetAddon::No),
            "No internet service" => Ok(InternetAddon::NoInternetService),
            other => Err(format!("unsupported internet-addon value: {other}")),
        }
    }
}

impl FromStr for InternetAddon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Contract {
    #[serde(rename = "Month-to-month")]
    MonthToMonth,
    #[serde(rename = "One year")]
    OneYear,
    #[serde(rename = "Two year")]
    TwoYear,
}

impl Contract {
    pub fn as_str(&self) -> &'static str {
        match self {
            Contract::MonthToMonth => "Month-to-month",
            Contract::OneYear => "One year",
            Contract::TwoYear => "Two year",
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Contract {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Month-to-month" => Ok(Contract::MonthToMonth),
            "One year" => Ok(Contract::OneYear),
            "Two year" => Ok(Contract::TwoYear),
            other => Err(format!("unsupported contract value: {other}")),
        }
    }
}

impl FromStr for Contract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "Electronic check")]
    ElectronicCheck,
    #[serde(rename = "Mailed check")]
    MailedCheck,
    #[serde(rename = "Bank transfer (automatic)")]
    BankTransfer,
    #[serde(rename = "Credit card (automatic)")]
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::ElectronicCheck => "Electronic check",
            PaymentMethod::MailedCheck => "Mailed check",
            PaymentMethod::BankTransfer => "Bank transfer (automatic)",
            PaymentMethod::CreditCard => "Credit card (automatic)",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Electronic check" => Ok(PaymentMethod::ElectronicCheck),
            "Mailed check" => Ok(PaymentMethod::MailedCheck),
            "Bank transfer (automatic)" => Ok(PaymentMethod::BankTransfer),
            "Credit card (automatic)" => Ok(PaymentMethod::CreditCard),
            other => Err(format!("unsupported payment-method value: {other}")),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Full customer attribute set sent to the risk model. Field names serialize
/// to the Telco dataset column names so the embedded JSON matches the schema
/// the model is prompted against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    pub gender: Gender,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: u8,
    #[serde(rename = "Partner")]
    pub partner: YesNo,
    #[serde(rename = "Dependents")]
    pub dependents: YesNo,
    pub tenure: i64,
    #[serde(rename = "PhoneService")]
    pub phone_service: YesNo,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: MultipleLines,
    #[serde(rename = "InternetService")]
    pub internet_service: InternetService,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: InternetAddon,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: InternetAddon,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: InternetAddon,
    #[serde(rename = "TechSupport")]
    pub tech_support: InternetAddon,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: InternetAddon,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: InternetAddon,
    #[serde(rename = "Contract")]
    pub contract: Contract,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: YesNo,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            senior_citizen: 0,
            partner: YesNo::Yes,
            dependents: YesNo::No,
            tenure: 12,
            phone_service: YesNo::Yes,
            multiple_lines: MultipleLines::No,
            internet_service: InternetService::FiberOptic,
            online_security: InternetAddon::No,
            online_backup: InternetAddon::No,
            device_protection: InternetAddon::No,
            tech_support: InternetAddon::No,
            streaming_tv: InternetAddon::No,
            streaming_movies: InternetAddon::No,
            contract: Contract::MonthToMonth,
            paperless_billing: YesNo::Yes,
            payment_method: PaymentMethod::ElectronicCheck,
            monthly_charges: 70.35,
            total_charges: 844.20,
        }
    }
}

/// Names one of the 19 editable profile fields, keyed by its dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Gender,
    SeniorCitizen,
    Partner,
    Dependents,
    Tenure,
    PhoneService,
    MultipleLines,
    InternetService,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    Contract,
    PaperlessBilling,
    PaymentMethod,
    MonthlyCharges,
    TotalCharges,
}

impl TryFrom<&str> for ProfileField {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "gender" => Ok(ProfileField::Gender),
            "SeniorCitizen" => Ok(ProfileField::SeniorCitizen),
            "Partner" => Ok(ProfileField::Partner),
            "Dependents" => Ok(ProfileField::Dependents),
            "tenure" => Ok(ProfileField::Tenure),
            "PhoneService" => Ok(ProfileField::PhoneService),
            "MultipleLines" => Ok(ProfileField::MultipleLines),
            "InternetService" => Ok(ProfileField::InternetService),
            "OnlineSecurity" => Ok(ProfileField::OnlineSecurity),
            "OnlineBackup" => Ok(ProfileField::OnlineBackup),
            "DeviceProtection" => Ok(ProfileField::DeviceProtection),
            "TechSupport" => Ok(ProfileField::TechSupport),
            "StreamingTV" => Ok(ProfileField::StreamingTv),
            "StreamingMovies" => Ok(ProfileField::StreamingMovies),
            "Contract" => Ok(ProfileField::Contract),
            "PaperlessBilling" => Ok(ProfileField::PaperlessBilling),
            "PaymentMethod" => Ok(ProfileField::PaymentMethod),
            "MonthlyCharges" => Ok(ProfileField::MonthlyCharges),
            "TotalCharges" => Ok(ProfileField::TotalCharges),
            other => Err(format!("unknown profile field: {other}")),
        }
    }
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl CustomerProfile {
    /// Apply a raw UI value to a single field. Enum fields reject unrecognized
    /// values; numeric fields are gated by parsing only (tenure outside the
    /// 0-72 UI domain is passed through).
    pub fn set_field(&mut self, field: ProfileField, raw: &str) -> AppResult<()> {
        let raw = raw.trim();
        match field {
            ProfileField::Gender => self.gender = parse_enum(raw)?,
            ProfileField::SeniorCitizen => {
                self.senior_citizen = match raw {
                    "0" => 0,
                    "1" => 1,
                    other => {
                        return Err(AppError::validation(format!(
                            "senior-citizen flag must be 0 or 1, got: {other}"
                        )))
                    }
                }
            }
            ProfileField::Partner => self.partner = parse_enum(raw)?,
            ProfileField::Dependents => self.dependents = parse_enum(raw)?,
            ProfileField::Tenure => {
                self.tenure = raw
                    .parse()
                    .map_err(|_| AppError::validation(format!("tenure is not an integer: {raw}")))?
            }
            ProfileField::PhoneService => self.phone_service = parse_enum(raw)?,
            ProfileField::MultipleLines => self.multiple_lines = parse_enum(raw)?,
            ProfileField::InternetService => self.internet_service = parse_enum(raw)?,
            ProfileField::OnlineSecurity => self.online_security = parse_enum(raw)?,
            ProfileField::OnlineBackup => self.online_backup = parse_enum(raw)?,
            ProfileField::DeviceProtection => self.device_protection = parse_enum(raw)?,
            ProfileField::TechSupport => self.tech_support = parse_enum(raw)?,
            ProfileField::StreamingTv => self.streaming_tv = parse_enum(raw)?,
            ProfileField::StreamingMovies => self.streaming_movies = parse_enum(raw)?,
            ProfileField::Contract => self.contract = parse_enum(raw)?,
            ProfileField::PaperlessBilling => self.paperless_billing = parse_enum(raw)?,
            ProfileField::PaymentMethod => self.payment_method = parse_enum(raw)?,
            ProfileField::MonthlyCharges => {
                self.monthly_charges = parse_currency(raw, "monthly charges")?
            }
            ProfileField::TotalCharges => {
                self.total_charges = parse_currency(raw, "total charges")?
            }
        }
        Ok(())
    }
}

fn parse_enum<T>(raw: &str) -> AppResult<T>
where
    T: for<'a> TryFrom<&'a str, Error = String>,
{
    T::try_from(raw).map_err(AppError::validation)
}

fn parse_currency(raw: &str, label: &str) -> AppResult<f64> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("{label} is not a number: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_seed_record() {
        let profile = CustomerProfile::default();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.tenure, 12);
        assert_eq!(profile.internet_service, InternetService::FiberOptic);
        assert_eq!(profile.contract, Contract::MonthToMonth);
        assert_eq!(profile.monthly_charges, 70.35);
        assert_eq!(profile.total_charges, 844.20);
    }

    #[test]
    fn profile_serializes_to_dataset_column_names() {
        let profile = CustomerProfile::default();
        let value = serde_json::to_value(&profile).expect("profile serializes");
        let obj = value.as_object().expect("profile is an object");

        assert_eq!(obj.len(), 19);
        assert_eq!(obj["gender"], "Female");
        assert_eq!(obj["SeniorCitizen"], 0);
        assert_eq!(obj["InternetService"], "Fiber optic");
        assert_eq!(obj["Contract"], "Month-to-month");
        assert_eq!(obj["PaymentMethod"], "Electronic check");
        assert_eq!(obj["TechSupport"], "No");
        assert_eq!(obj["MonthlyCharges"], 70.35);
    }

    #[test]
    fn set_field_rejects_unrecognized_enum_values() {
        let mut profile = CustomerProfile::default();
        let error = profile
            .set_field(ProfileField::InternetService, "Satellite")
            .expect_err("unknown internet service must be rejected");
        assert!(matches!(error, AppError::Validation { .. }));

        profile
            .set_field(ProfileField::InternetService, "DSL")
            .expect("known value applies");
        assert_eq!(profile.internet_service, InternetService::Dsl);
    }

    #[test]
    fn set_field_parses_numeric_columns() {
        let mut profile = CustomerProfile::default();

        profile
            .set_field(ProfileField::Tenure, "48")
            .expect("tenure applies");
        assert_eq!(profile.tenure, 48);

        profile
            .set_field(ProfileField::MonthlyCharges, "99.95")
            .expect("charges apply");
        assert_eq!(profile.monthly_charges, 99.95);

        let error = profile
            .set_field(ProfileField::Tenure, "twelve")
            .expect_err("non-numeric tenure must be rejected");
        assert!(matches!(error, AppError::Validation { .. }));
    }

    #[test]
    fn senior_citizen_flag_is_zero_or_one() {
        let mut profile = CustomerProfile::default();
        profile
            .set_field(ProfileField::SeniorCitizen, "1")
            .expect("flag applies");
        assert_eq!(profile.senior_citizen, 1);

        assert!(profile.set_field(ProfileField::SeniorCitizen, "2").is_err());
    }
}
