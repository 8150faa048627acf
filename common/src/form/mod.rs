//! Form-fill state: the value typed for every placeholder of a template and
//! the progress derived from it.
//!
//! Values are keyed by bare placeholder key. The state is owned by the fill
//! page; OCR results and address picks are merged into it without disturbing
//! what the user already typed.

pub mod validation;

use crate::fields::detect::detect_field_type;
use crate::model::address::AddressResult;
use crate::model::field::{bare_key, DataType, FieldDefinitions};
use indexmap::IndexMap;

/// Entity prefixes that scope address back-filling to one person.
const ENTITY_PREFIXES: &[&str] = &["m_", "f_", "b_", "r_", "c_"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    values: IndexMap<String, String>,
}

/// Which part of a Thai address a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPart {
    Subdistrict,
    District,
    Province,
    PostalCode,
}

impl AddressPart {
    pub fn value_of(self, address: &AddressResult) -> &str {
        match self {
            AddressPart::Subdistrict => &address.subdistrict,
            AddressPart::District => &address.district,
            AddressPart::Province => &address.province,
            AddressPart::PostalCode => &address.postal_code,
        }
    }
}

/// Classifies a field by its data type first, then by keywords in its key
/// and placeholder. Sub-district keywords are tested before district ones.
pub fn address_part(key: &str, definitions: Option<&FieldDefinitions>) -> Option<AddressPart> {
    let definition = definitions.and_then(|d| d.get(key));
    let data_type = definition
        .map(|d| d.data_type.clone())
        .unwrap_or_else(|| detect_field_type(key).data_type);
    match data_type {
        DataType::Subdistrict => return Some(AddressPart::Subdistrict),
        DataType::District => return Some(AddressPart::District),
        DataType::Province => return Some(AddressPart::Province),
        _ => {}
    }

    let mut haystack = key.to_lowercase();
    if let Some(def) = definition {
        haystack.push(' ');
        haystack.push_str(&def.placeholder.to_lowercase());
    }
    let has = |needles: &[&str]| needles.iter().any(|n| haystack.contains(n));

    if has(&["zip", "postal", "postcode", "post_code", "รหัสไปรษณีย์"]) {
        Some(AddressPart::PostalCode)
    } else if has(&["subdist", "sub_dist", "tambon", "tumbon", "ตำบล", "แขวง"]) {
        Some(AddressPart::Subdistrict)
    } else if has(&["dist", "amphoe", "amphur", "อำเภอ", "เขต"]) {
        Some(AddressPart::District)
    } else if has(&["prov", "จังหวัด"]) {
        Some(AddressPart::Province)
    } else {
        None
    }
}

fn entity_prefix(key: &str) -> Option<&'static str> {
    let lower = key.to_lowercase();
    ENTITY_PREFIXES.iter().copied().find(|p| lower.starts_with(p))
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state with one empty value per distinct placeholder.
    pub fn initialize<S: AsRef<str>>(placeholders: &[S]) -> Self {
        let values = placeholders
            .iter()
            .map(|p| (bare_key(p.as_ref()).to_string(), String::new()))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(bare_key(key).to_string(), value.into());
    }

    pub fn total_fields_count(&self) -> usize {
        self.values.len()
    }

    /// Fields holding something other than whitespace.
    pub fn filled_fields_count(&self) -> usize {
        self.values.values().filter(|v| !v.trim().is_empty()).count()
    }

    /// Rounded percentage of filled fields; 0 for an empty form.
    pub fn progress_percentage(&self) -> u32 {
        let total = self.total_fields_count();
        if total == 0 {
            return 0;
        }
        (self.filled_fields_count() as f64 * 100.0 / total as f64).round() as u32
    }

    /// Merges OCR output over the current values. Keys not present in `data`
    /// keep their values.
    pub fn handle_ocr_data_extracted(&mut self, data: &IndexMap<String, String>) {
        for (key, value) in data {
            self.values.insert(bare_key(key).to_string(), value.clone());
        }
    }

    /// Back-fills the sub-district, district, province and postal-code fields
    /// related to `trigger` after the user picked `address` in it.
    ///
    /// Only empty fields are written and the trigger itself is never touched.
    /// When the trigger carries an entity prefix (`m_`, `f_`, ...) only fields
    /// with the same prefix are considered.
    ///
    /// # Returns
    /// The keys that received a value.
    pub fn handle_address_select(
        &mut self,
        trigger: &str,
        address: &AddressResult,
        definitions: Option<&FieldDefinitions>,
    ) -> Vec<String> {
        let trigger = bare_key(trigger);
        let scope = entity_prefix(trigger);
        let mut filled = Vec::new();

        let candidates: Vec<String> = self
            .values
            .iter()
            .filter(|(key, value)| key.as_str() != trigger && value.trim().is_empty())
            .filter(|(key, _)| scope.is_none_or(|p| key.to_lowercase().starts_with(p)))
            .map(|(key, _)| key.clone())
            .collect();

        for key in candidates {
            let Some(part) = address_part(&key, definitions) else {
                continue;
            };
            let value = part.value_of(address);
            if value.is_empty() {
                continue;
            }
            self.values.insert(key.clone(), value.to_string());
            filled.push(key);
        }
        filled
    }

    /// Empties every listed placeholder.
    pub fn reset_form_data<S: AsRef<str>>(&mut self, placeholders: &[S]) {
        for placeholder in placeholders {
            self.values
                .insert(bare_key(placeholder.as_ref()).to_string(), String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::detect::generate_field_definitions;
    use pretty_assertions::assert_eq;

    fn bangkok() -> AddressResult {
        AddressResult {
            subdistrict: "ลุมพินี".into(),
            district: "ปทุมวัน".into(),
            province: "กรุงเทพมหานคร".into(),
            postal_code: "10330".into(),
        }
    }

    #[test]
    fn initialize_creates_one_empty_value_per_placeholder() {
        let form = FormData::initialize(&["{{a}}", "{{b}}", "{{c}}"]);
        assert_eq!(form.total_fields_count(), 3);
        assert!(form.values().values().all(String::is_empty));
        assert_eq!(form.filled_fields_count(), 0);
        assert_eq!(form.progress_percentage(), 0);
    }

    #[test]
    fn empty_form_has_zero_progress() {
        let form = FormData::initialize::<&str>(&[]);
        assert_eq!(form.total_fields_count(), 0);
        assert_eq!(form.progress_percentage(), 0);
    }

    #[test]
    fn name_and_email_scenario() {
        let placeholders = ["{{name}}", "{{email}}"];
        let mut form = FormData::initialize(&placeholders);

        form.set_field("name", "John");
        assert_eq!(form.filled_fields_count(), 1);
        assert_eq!(form.progress_percentage(), 50);

        form.set_field("email", "a@b.com");
        assert_eq!(form.filled_fields_count(), 2);
        assert_eq!(form.progress_percentage(), 100);

        form.reset_form_data(&placeholders);
        assert_eq!(form.get("name"), "");
        assert_eq!(form.get("email"), "");
        assert_eq!(form.filled_fields_count(), 0);
    }

    #[test]
    fn whitespace_does_not_count_and_progress_rounds() {
        let mut form = FormData::initialize(&["a", "b", "c"]);
        form.set_field("a", "   ");
        assert_eq!(form.filled_fields_count(), 0);
        form.set_field("b", "x");
        assert_eq!(form.progress_percentage(), 33);
        form.set_field("c", "y");
        assert_eq!(form.progress_percentage(), 67);
    }

    #[test]
    fn ocr_merges_without_clearing() {
        let mut form = FormData::initialize(&["name", "surname", "dob"]);
        form.set_field("dob", "01/01/2560");
        let mut ocr = IndexMap::new();
        ocr.insert("name".to_string(), "สมชาย".to_string());
        ocr.insert("{{surname}}".to_string(), "ใจดี".to_string());
        form.handle_ocr_data_extracted(&ocr);
        assert_eq!(form.get("name"), "สมชาย");
        assert_eq!(form.get("surname"), "ใจดี");
        assert_eq!(form.get("dob"), "01/01/2560");
    }

    #[test]
    fn address_select_fills_related_empty_fields_only() {
        let mut form = FormData::initialize(&["address", "subdistrict", "district", "province", "zipcode"]);
        form.set_field("address", "99/1 ถนนวิทยุ");
        form.set_field("province", "นนทบุรี");

        let filled = form.handle_address_select("address", &bangkok(), None);
        assert_eq!(filled, vec!["subdistrict", "district", "zipcode"]);
        assert_eq!(form.get("address"), "99/1 ถนนวิทยุ");
        assert_eq!(form.get("subdistrict"), "ลุมพินี");
        assert_eq!(form.get("district"), "ปทุมวัน");
        assert_eq!(form.get("province"), "นนทบุรี");
        assert_eq!(form.get("zipcode"), "10330");
    }

    #[test]
    fn address_select_never_writes_the_trigger() {
        let mut form = FormData::initialize(&["m_subdist", "m_dist", "m_prov"]);
        let filled = form.handle_address_select("m_subdist", &bangkok(), None);
        assert_eq!(filled, vec!["m_dist", "m_prov"]);
        assert_eq!(form.get("m_subdist"), "");
    }

    #[test]
    fn address_select_stays_within_the_entity() {
        let placeholders = ["m_address", "m_prov", "f_prov"];
        let defs = generate_field_definitions(&placeholders);
        let mut form = FormData::initialize(&placeholders);
        let filled = form.handle_address_select("m_address", &bangkok(), Some(&defs));
        assert_eq!(filled, vec!["m_prov"]);
        assert_eq!(form.get("f_prov"), "");
    }

    #[test]
    fn address_parts_from_keywords() {
        assert_eq!(address_part("m_tambon", None), Some(AddressPart::Subdistrict));
        assert_eq!(address_part("post_code", None), Some(AddressPart::PostalCode));
        assert_eq!(address_part("remark", None), None);
    }
}
