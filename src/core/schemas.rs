//! Canonical column definitions for the catalog file.
//!
//! The on-disk table is a CSV file whose header must match the active
//! [`Schema`]. Older files may lack columns; see `core::migration` for how they
//! are brought up to date.

pub const DEFAULT_DATA_FILE: &str = "ai_tools_database.csv";

/// Placeholder offered by pickers before the user chooses a category.
pub const CATEGORY_SENTINEL: &str = "Select Category";

/// Placeholder offered by the roster picker before a contributor is chosen.
pub const UPLOADER_SENTINEL: &str = "Select Contributor";

/// `Date_Time` serialization format.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Content Creation",
    "Image Generation",
    "Data Analysis",
    "Social Media Management",
    "Email Marketing",
    "SEO Tools",
    "Video Editing",
    "Voice/Audio",
    "Translation",
    "Chatbots",
    "Design Tools",
    "Analytics",
    "PPT Creation",
    "Others",
];

/// One column of the catalog table, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SerialNumber,
    Name,
    ToolLink,
    Category,
    UploadedBy,
    DateTime,
    Purpose,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::SerialNumber,
        Field::Name,
        Field::ToolLink,
        Field::Category,
        Field::UploadedBy,
        Field::DateTime,
        Field::Purpose,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Field::SerialNumber => "Serial_Number",
            Field::Name => "Name",
            Field::ToolLink => "Tool_Link",
            Field::Category => "Category",
            Field::UploadedBy => "Uploaded_By",
            Field::DateTime => "Date_Time",
            Field::Purpose => "Purpose",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.column_name() == name.trim())
    }

    /// Value synthesized for rows that predate the column. Every field is
    /// text on disk, so the default is the empty string.
    pub fn default_value(&self) -> &'static str {
        ""
    }
}

/// Ordered set of fields that the file and every returned record carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Full column set, tool link included.
    pub fn canonical() -> Self {
        Self {
            fields: Field::ALL.to_vec(),
        }
    }

    /// Variant used by catalogs configured without the tool link column.
    pub fn without_tool_link() -> Self {
        Self {
            fields: Field::ALL
                .into_iter()
                .filter(|f| *f != Field::ToolLink)
                .collect(),
        }
    }

    pub fn with_tool_link(enabled: bool) -> Self {
        if enabled {
            Self::canonical()
        } else {
            Self::without_tool_link()
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column_name()).collect()
    }

    /// The field a missing column is inserted after: its nearest canonical
    /// predecessor within this schema. `None` means "insert first".
    pub fn anchor_of(&self, field: Field) -> Option<Field> {
        let pos = self.fields.iter().position(|f| *f == field)?;
        pos.checked_sub(1).map(|p| self.fields[p])
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::canonical()
    }
}
