//! Account provisioning schema, credential options and profile validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zuper_core::{AppError, AppResult};

/// Minimum length of generated passwords.
pub const MIN_GENERATED_PASSWORD_LENGTH: usize = 12;

/// Designation given to accounts created by the connector.
pub const PROVISIONED_DESIGNATION: &str = "Field Executive";

/// Credential strategies a host may request when creating an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialOption {
    /// Connector generates a random password and returns it once.
    RandomPassword,
    /// Account is created without a credential.
    NoPassword,
    /// Account authenticates through single sign-on.
    Sso,
    /// Host supplies an encrypted password.
    EncryptedPassword,
}

/// Credential request sent with an account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialOptions {
    /// Requested strategy.
    pub option: CredentialOption,
    /// Requested password length for [`CredentialOption::RandomPassword`].
    #[serde(default)]
    pub length: usize,
}

impl CredentialOptions {
    /// Random password request with the given length.
    #[must_use]
    pub fn random_password(length: usize) -> Self {
        Self {
            option: CredentialOption::RandomPassword,
            length,
        }
    }
}

/// Provisioning capability advertised to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialCapability {
    /// Options the connector accepts.
    pub supported: Vec<CredentialOption>,
    /// Option the host should pick by default.
    pub preferred: CredentialOption,
}

/// One field of the account creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountCreationField {
    /// Profile key.
    pub name: &'static str,
    /// Label.
    pub display_name: &'static str,
    /// Help text.
    pub description: &'static str,
    /// Input placeholder.
    pub placeholder: &'static str,
    /// Whether the field must be present and non-empty.
    pub required: bool,
    /// Display order, starting at 1.
    pub order: u8,
}

/// Schema of the account creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountCreationSchema {
    /// Fields in display order.
    pub fields: Vec<AccountCreationField>,
}

impl AccountCreationSchema {
    /// Schema for Zuper accounts: four required string fields.
    #[must_use]
    pub fn zuper() -> Self {
        let field = |name, display_name, description, placeholder, order| AccountCreationField {
            name,
            display_name,
            description,
            placeholder,
            required: true,
            order,
        };

        Self {
            fields: vec![
                field(
                    "first_name",
                    "first_name",
                    "This first_name will be used for the user.",
                    "first_name",
                    1,
                ),
                field(
                    "last_name",
                    "last_name",
                    "This last_name will be used for the user.",
                    "last_name",
                    2,
                ),
                field(
                    "email",
                    "Email",
                    "This email will be used as the login for the user.",
                    "Email",
                    3,
                ),
                field(
                    "emp_code",
                    "Emp_code",
                    "This emp_code will be used for the user.",
                    "emp_code",
                    4,
                ),
            ],
        }
    }
}

/// Profile fields required to create an account, all validated non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email address.
    pub email: String,
    /// Employment code.
    pub emp_code: String,
}

impl AccountProfile {
    /// Validates a host profile map. Every field must be a non-empty string.
    pub fn from_profile(profile: &Map<String, Value>) -> AppResult<Self> {
        Ok(Self {
            first_name: required_field(profile, "first_name")?,
            last_name: required_field(profile, "last_name")?,
            email: required_field(profile, "email")?,
            emp_code: required_field(profile, "emp_code")?,
        })
    }
}

/// Only the empty string counts as missing; whitespace is passed through to Zuper.
fn required_field(profile: &Map<String, Value>, name: &str) -> AppResult<String> {
    profile
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
