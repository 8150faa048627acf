//! Default field definitions inferred from placeholder keys.
//!
//! Templates arrive with nothing but `{{key}}` tokens. Before a user has
//! configured anything, the editor and the fill form need a reasonable guess
//! for every key: a data type, an input widget and the person the field
//! belongs to. The guess is made by testing the lower-cased bare key against
//! an ordered rule list where the first match wins, so more specific rules
//! (sub-district, officer name) sit before the generic ones they would
//! otherwise be swallowed by (district, name).

use crate::fields::merge::sequence_number;
use crate::model::field::{
    bare_key, placeholder_token, DataType, Entity, FieldDefinition, FieldDefinitions,
    FieldValidation, InputType,
};
use regex::Regex;
use std::sync::LazyLock;

/// Keys that only ever describe the registered child.
const CHILD_KEYS: &[&str] = &[
    "name",
    "surname",
    "dob",
    "birth_date",
    "birth_time",
    "birth_place",
    "sex",
    "gender",
    "nationality",
    "religion",
    "child_no",
    "weight",
    "id_number",
];

const NAME_PREFIXES: &[&str] = &["นาย", "นาง", "นางสาว", "เด็กชาย", "เด็กหญิง"];

const WEEKDAYS: &[&str] = &[
    "อาทิตย์",
    "จันทร์",
    "อังคาร",
    "พุธ",
    "พฤหัสบดี",
    "ศุกร์",
    "เสาร์",
];

const ZODIAC_YEARS: &[&str] = &[
    "ชวด", "ฉลู", "ขาล", "เถาะ", "มะโรง", "มะเส็ง", "มะเมีย", "มะแม", "วอก", "ระกา", "จอ", "กุน",
];

static AGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|_)age($|_|\d)").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|_)time($|_|\d)").unwrap());
static DATE_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|_)(dd|mm|yy|yyyy)$").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|_)(tel|phone|mobile)($|_|\d)").unwrap());

/// How a rule matched key maps to a definition.
struct Detected {
    data_type: DataType,
    input_type: InputType,
    validation: Option<FieldValidation>,
}

impl Detected {
    fn new(data_type: DataType, input_type: InputType) -> Self {
        Self {
            data_type,
            input_type,
            validation: None,
        }
    }

    fn with(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }
}

fn contains_any(key: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| key.contains(n))
}

fn options(values: &[&str]) -> FieldValidation {
    FieldValidation {
        options: Some(values.iter().map(|v| v.to_string()).collect()),
        ..Default::default()
    }
}

fn digits(count: usize) -> FieldValidation {
    FieldValidation {
        pattern: Some(format!(r"^\d{{{}}}$", count)),
        min_length: Some(count),
        max_length: Some(count),
        ..Default::default()
    }
}

fn detect(key: &str) -> Detected {
    if contains_any(key, &["id_card", "idcard", "id_number", "id_no", "national_id", "citizen_id"])
        || key == "id"
        || key == "pid"
        || key.ends_with("_id")
        || key.ends_with("_pid")
    {
        return Detected::new(DataType::IdNumber, InputType::Digit).with(digits(13));
    }
    if contains_any(key, &["prefix", "title_name"]) || key.ends_with("_pre") {
        return Detected::new(DataType::NamePrefix, InputType::Select).with(options(NAME_PREFIXES));
    }
    if AGE_RE.is_match(key) {
        return Detected::new(DataType::Age, InputType::Number).with(FieldValidation {
            min: Some(0.0),
            max: Some(150.0),
            ..Default::default()
        });
    }
    if contains_any(key, &["date", "dob"]) || DATE_PART_RE.is_match(key) {
        return Detected::new(DataType::Date, InputType::Date);
    }
    if TIME_RE.is_match(key) {
        return Detected::new(DataType::Time, InputType::Time);
    }
    if contains_any(key, &["weekday", "day_name"]) {
        return Detected::new(DataType::Weekday, InputType::Select).with(options(WEEKDAYS));
    }
    if key.contains("prov") {
        return Detected::new(DataType::Province, InputType::Location);
    }
    if contains_any(key, &["subdist", "sub_dist", "tambon", "tumbon"]) {
        return Detected::new(DataType::Subdistrict, InputType::Location);
    }
    if contains_any(key, &["dist", "amphoe", "amphur"]) {
        return Detected::new(DataType::District, InputType::Location);
    }
    if contains_any(key, &["country", "nation"]) {
        return Detected::new(DataType::Country, InputType::Select);
    }
    if key.contains("addr") {
        return Detected::new(DataType::Address, InputType::Textarea);
    }
    if contains_any(key, &["officer", "registrar_name", "reg_name"])
        || (key.starts_with("r_") && key.contains("name"))
    {
        return Detected::new(DataType::OfficerName, InputType::Text);
    }
    if key.contains("name") {
        return Detected::new(DataType::Name, InputType::Text);
    }
    if contains_any(key, &["house_code", "house_no", "hcode", "home_code"]) {
        return Detected::new(DataType::HouseCode, InputType::Digit).with(digits(11));
    }
    if key.contains("zodiac") {
        return Detected::new(DataType::Zodiac, InputType::Select).with(options(ZODIAC_YEARS));
    }
    if key.contains("lunar") {
        let months: Vec<String> = (1..=12).map(|m| m.to_string()).collect();
        return Detected::new(DataType::LunarMonth, InputType::Select).with(FieldValidation {
            options: Some(months),
            ..Default::default()
        });
    }
    if sequence_number(key).is_some() {
        return Detected::new(DataType::Number, InputType::Digit).with(FieldValidation {
            pattern: Some(r"^\d$".to_string()),
            max_length: Some(1),
            ..Default::default()
        });
    }
    if contains_any(key, &["child_no", "child_number"]) || key.starts_with("c_no") {
        return Detected::new(DataType::Number, InputType::Number).with(FieldValidation {
            min: Some(1.0),
            ..Default::default()
        });
    }
    if key.contains("email") {
        return Detected::new(DataType::Email, InputType::Text);
    }
    if PHONE_RE.is_match(key) {
        return Detected::new(DataType::Phone, InputType::Text).with(digits(10));
    }
    Detected::new(DataType::Text, InputType::Text)
}

/// Builds the default definition for a single placeholder.
///
/// Accepts either a raw token (`{{m_prov}}`) or a bare key. Never fails:
/// unknown keys fall back to free text.
pub fn detect_field_type(placeholder: &str) -> FieldDefinition {
    let key = bare_key(placeholder);
    let lower = key.to_lowercase();
    let detected = detect(&lower);

    FieldDefinition {
        placeholder: placeholder_token(key),
        data_type: detected.data_type,
        entity: detect_entity(key),
        input_type: detected.input_type,
        validation: detected.validation,
        ..Default::default()
    }
}

/// Classifies a key into one of the six fixed entities.
pub fn detect_entity(key: &str) -> Entity {
    let key = bare_key(key).to_lowercase();
    if key.starts_with("m_") {
        Entity::Mother
    } else if key.starts_with("f_") {
        Entity::Father
    } else if key.starts_with("b_") {
        Entity::Informant
    } else if key.starts_with("r_") {
        Entity::Registrar
    } else if key.starts_with("c_") || CHILD_KEYS.contains(&key.as_str()) {
        Entity::Child
    } else {
        Entity::General
    }
}

/// Default definitions for a placeholder list, `order` following the list.
///
/// Repeated keys keep their first position.
pub fn generate_field_definitions<S: AsRef<str>>(placeholders: &[S]) -> FieldDefinitions {
    let mut definitions = FieldDefinitions::new();
    for placeholder in placeholders {
        let key = bare_key(placeholder.as_ref());
        if key.is_empty() || definitions.contains_key(key) {
            continue;
        }
        let mut definition = detect_field_type(key);
        definition.order = Some(definitions.len() as i64);
        definitions.insert(key.to_string(), definition);
    }
    definitions
}

/// Completes saved definitions with defaults for placeholders the API has no
/// definition for yet. Saved entries are left untouched; new entries are
/// appended after the highest saved `order`.
pub fn complete_field_definitions<S: AsRef<str>>(
    mut saved: FieldDefinitions,
    placeholders: &[S],
) -> FieldDefinitions {
    let mut next_order = saved
        .values()
        .filter_map(|d| d.order)
        .max()
        .map_or(0, |max| max + 1);

    for placeholder in placeholders {
        let key = bare_key(placeholder.as_ref());
        if key.is_empty() || saved.contains_key(key) {
            continue;
        }
        let mut definition = detect_field_type(key);
        definition.order = Some(next_order);
        next_order += 1;
        saved.insert(key.to_string(), definition);
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind(placeholder: &str) -> (DataType, InputType) {
        let d = detect_field_type(placeholder);
        (d.data_type, d.input_type)
    }

    #[test]
    fn id_numbers_have_a_thirteen_digit_rule() {
        let d = detect_field_type("{{m_id}}");
        assert_eq!(d.data_type, DataType::IdNumber);
        assert_eq!(d.input_type, InputType::Digit);
        let v = d.validation.unwrap();
        assert_eq!(v.pattern.as_deref(), Some(r"^\d{13}$"));
        assert_eq!(v.max_length, Some(13));
        assert_eq!(kind("citizen_id").0, DataType::IdNumber);
        assert_eq!(kind("pid").0, DataType::IdNumber);
        // The `_id` suffix is tested before the house-code rule.
        assert_eq!(kind("house_id").0, DataType::IdNumber);
    }

    #[test]
    fn name_prefixes_are_selects() {
        assert_eq!(kind("m_prefix"), (DataType::NamePrefix, InputType::Select));
        assert_eq!(kind("c_title_name").0, DataType::NamePrefix);
        assert_eq!(kind("f_pre").0, DataType::NamePrefix);
    }

    #[test]
    fn age_needs_a_word_boundary() {
        assert_eq!(kind("m_age"), (DataType::Age, InputType::Number));
        assert_eq!(kind("age1").0, DataType::Age);
        assert_eq!(kind("page_count").0, DataType::Text);
        assert_eq!(kind("marriage_place").0, DataType::Text);
    }

    #[test]
    fn dates_come_from_date_words_not_birth() {
        assert_eq!(kind("birth_date"), (DataType::Date, InputType::Date));
        assert_eq!(kind("m_dob").0, DataType::Date);
        assert_eq!(kind("reg_dd").0, DataType::Date);
        assert_eq!(kind("reg_yyyy").0, DataType::Date);
        assert_eq!(kind("birth_place"), (DataType::Text, InputType::Text));
    }

    #[test]
    fn time_needs_a_word_boundary() {
        assert_eq!(kind("birth_time"), (DataType::Time, InputType::Time));
        assert_eq!(kind("time2").0, DataType::Time);
        assert_eq!(kind("timeline").0, DataType::Text);
    }

    #[test]
    fn weekdays_are_selects() {
        assert_eq!(kind("weekday"), (DataType::Weekday, InputType::Select));
        assert_eq!(kind("c_day_name").0, DataType::Weekday);
    }

    #[test]
    fn address_parts_are_told_apart() {
        assert_eq!(kind("{{m_prov}}"), (DataType::Province, InputType::Location));
        assert_eq!(kind("{{m_subdist}}"), (DataType::Subdistrict, InputType::Location));
        assert_eq!(kind("sub_district").0, DataType::Subdistrict);
        assert_eq!(kind("m_tambon").0, DataType::Subdistrict);
        assert_eq!(kind("{{m_dist}}"), (DataType::District, InputType::Location));
        assert_eq!(kind("f_amphoe").0, DataType::District);
        assert_eq!(kind("{{f_address}}"), (DataType::Address, InputType::Textarea));
    }

    #[test]
    fn countries_are_selects() {
        assert_eq!(kind("country"), (DataType::Country, InputType::Select));
        assert_eq!(kind("m_nationality").0, DataType::Country);
    }

    #[test]
    fn officer_name_wins_over_name() {
        assert_eq!(kind("r_name").0, DataType::OfficerName);
        assert_eq!(kind("officer_fullname").0, DataType::OfficerName);
        assert_eq!(kind("registrar_name").0, DataType::OfficerName);
        assert_eq!(kind("m_name"), (DataType::Name, InputType::Text));
    }

    #[test]
    fn house_codes_have_eleven_digits() {
        assert_eq!(kind("house_code"), (DataType::HouseCode, InputType::Digit));
        let d = detect_field_type("house_no");
        assert_eq!(d.data_type, DataType::HouseCode);
        assert_eq!(d.validation.unwrap().pattern.as_deref(), Some(r"^\d{11}$"));
    }

    #[test]
    fn zodiac_and_lunar_month_are_selects() {
        let zodiac = detect_field_type("zodiac");
        assert_eq!(zodiac.input_type, InputType::Select);
        assert_eq!(zodiac.validation.unwrap().options.unwrap().len(), 12);
        assert_eq!(kind("lunar_month"), (DataType::LunarMonth, InputType::Select));
    }

    #[test]
    fn sequences_become_single_digits() {
        assert_eq!(kind("{{$1}}"), (DataType::Number, InputType::Digit));
        assert_eq!(kind("4d_3"), (DataType::Number, InputType::Digit));
        assert_eq!(kind("digit12"), (DataType::Number, InputType::Digit));
    }

    #[test]
    fn child_numbers_are_numbers() {
        assert_eq!(kind("child_no"), (DataType::Number, InputType::Number));
        assert_eq!(kind("c_no2"), (DataType::Number, InputType::Number));
    }

    #[test]
    fn contact_rules_run_last() {
        assert_eq!(kind("contact_email"), (DataType::Email, InputType::Text));
        assert_eq!(kind("b_phone").0, DataType::Phone);
        assert_eq!(kind("tel2").0, DataType::Phone);
        assert_eq!(kind("hotel").0, DataType::Text);
    }

    #[test]
    fn unknown_keys_are_free_text() {
        assert_eq!(kind("remark"), (DataType::Text, InputType::Text));
    }


    #[test]
    fn entities_follow_prefixes() {
        assert_eq!(detect_entity("m_prov"), Entity::Mother);
        assert_eq!(detect_entity("{{f_name}}"), Entity::Father);
        assert_eq!(detect_entity("b_name"), Entity::Informant);
        assert_eq!(detect_entity("r_name"), Entity::Registrar);
        assert_eq!(detect_entity("surname"), Entity::Child);
        assert_eq!(detect_entity("c_weight"), Entity::Child);
        assert_eq!(detect_entity("doc_no"), Entity::General);
    }

    #[test]
    fn generated_definitions_keep_document_order() {
        let defs = generate_field_definitions(&["{{name}}", "{{m_name}}", "{{name}}", "{{$1}}"]);
        let keys: Vec<&str> = defs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "m_name", "$1"]);
        assert_eq!(defs["$1"].order, Some(2));
        assert_eq!(defs["m_name"].placeholder, "{{m_name}}");
    }

    #[test]
    fn completion_appends_missing_keys_only() {
        let mut saved = generate_field_definitions(&["a", "b"]);
        saved.get_mut("a").unwrap().description = Some("kept".into());
        let all = complete_field_definitions(saved, &["{{a}}", "{{c}}"]);
        assert_eq!(all.len(), 3);
        assert_eq!(all["a"].description.as_deref(), Some("kept"));
        assert_eq!(all["c"].order, Some(2));
    }
}
