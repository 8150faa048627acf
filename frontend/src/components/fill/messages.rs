use common::model::address::AddressResult;
use common::model::field::FieldDefinitions;
use common::model::template::{ProcessResult, Template};
use indexmap::IndexMap;

pub enum Msg {
    Loaded {
        template: Template,
        definitions: FieldDefinitions,
    },
    LoadFailed(String),
    SetField(String, String),
    /// Raw text typed in a merged input, keyed by the master.
    SetMerged(String, String),
    SelectRadio {
        master: String,
        option: String,
    },
    ToggleCheckbox(String, bool),
    AddressSelected {
        trigger: String,
        address: AddressResult,
    },
    OpenOcrDialog,
    OcrFileSelected(Option<web_sys::File>),
    OcrExtracted(IndexMap<String, String>),
    OcrFailed(String),
    Submit,
    Processed(ProcessResult),
    ProcessFailed(String),
    Reset,
}
