//! Hotel display settings (singleton).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DbId;

pub const DEFAULT_HOTEL_NAME: &str = "Sunin Hotel";
pub const DEFAULT_HOTEL_ADDRESS: &str = "Vientiane, Lao PDR";
pub const DEFAULT_HOTEL_PHONE: &str = "+856 20 1234 5678";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: DbId,
    pub hotel_name: String,
    pub hotel_address: String,
    pub hotel_phone: String,
    #[serde(default)]
    pub hotel_logo: Option<String>,
    /// Percentage shown on invoices; never used in reservation math.
    #[serde(default)]
    pub tax_rate: f64,
}

impl Settings {
    pub fn defaults(id: DbId) -> Self {
        Self {
            id,
            hotel_name: DEFAULT_HOTEL_NAME.to_string(),
            hotel_address: DEFAULT_HOTEL_ADDRESS.to_string(),
            hotel_phone: DEFAULT_HOTEL_PHONE.to_string(),
            hotel_logo: None,
            tax_rate: 0.0,
        }
    }

    pub fn apply(&mut self, update: UpdateSettings) {
        if let Some(name) = update.hotel_name {
            self.hotel_name = name.trim().to_string();
        }
        if let Some(address) = update.hotel_address {
            self.hotel_address = address;
        }
        if let Some(phone) = update.hotel_phone {
            self.hotel_phone = phone;
        }
        if let Some(logo) = update.hotel_logo {
            self.hotel_logo = (!logo.is_empty()).then_some(logo);
        }
        if let Some(rate) = update.tax_rate {
            self.tax_rate = rate;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub hotel_name: Option<String>,
    pub hotel_address: Option<String>,
    pub hotel_phone: Option<String>,
    /// Empty string removes the logo.
    pub hotel_logo: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "taxRate must be between 0 and 100"))]
    pub tax_rate: Option<f64>,
}
