use common::model::console::DataTypeConfig;
use common::model::field::FieldDefinitions;
use common::model::template::Template;

pub enum Msg {
    Loaded {
        template: Template,
        definitions: FieldDefinitions,
    },
    DataTypesLoaded(Vec<DataTypeConfig>),
    LoadFailed(String),
    SetTab(String),
    PreviewLoaded(String),
    PreviewFailed(String),

    SelectField(String),
    SetDataType(String, String),
    SetInputType(String, String),
    SetEntity(String, String),
    SetDescription(String, String),
    SetRequired(String, bool),
    SetOptions(String, String),

    SetNewSectionName(String),
    AddSection,
    RenameSection(String, String),
    SetSectionColor(String, usize),
    MoveSectionUp(String),
    RemoveSection(String),
    MoveField { key: String, section_id: String },

    OpenMergeDialog,
    SetMergeLabel(usize, String),
    SetMergeSeparator(usize, String),
    ApplyMerge(usize),
    Unmerge(String),

    OpenRadioDialog,
    SetRadioLabel(String),
    ToggleRadioOption(String),
    SetRadioOptionLabel(String, String),
    ApplyRadio,
    RemoveRadioGroup(String),

    Save,
    SaveSucceeded,
    SaveFailed(String),
}
