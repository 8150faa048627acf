use serde::{Deserialize, Serialize};

/// One match from `GET /address/search`: a Thai sub-district with the
/// district, province and postal code that contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResult {
    pub subdistrict: String,
    pub district: String,
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
}

impl AddressResult {
    /// Single-line label for the suggestion list.
    pub fn label(&self) -> String {
        let mut label = format!("{} » {} » {}", self.subdistrict, self.district, self.province);
        if !self.postal_code.is_empty() {
            label.push(' ');
            label.push_str(&self.postal_code);
        }
        label
    }
}
