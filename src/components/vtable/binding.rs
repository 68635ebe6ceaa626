//! Row Template and Field Binding
//!
//! A row is produced by copying named record fields into template slots,
//! optionally through one of a closed set of presentation transforms.

use crate::constants::{BUILTIN_FILE_ICON, BUILTIN_FOLDER_ICON};
use crate::domain::file_info::FileInfo;
use crate::domain::icon::IconResource;
use crate::error::{Error, Result};
use crate::utils::format::{HighlightSpan, format_date, format_size, highlight_words};

use super::icon_cache::IconCache;

/// Value of one named record field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
    Words(Vec<String>),
}

impl FieldValue {
    /// Display text of the value; missing renders empty
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Words(words) => words.join(" "),
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, FieldValue::Bool(true))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Number)
    }
}

/// A record whose fields can be read by name
pub trait Record {
    fn field(&self, name: &str) -> FieldValue;
}

impl Record for FileInfo {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "key" => FieldValue::Text(self.key.clone()),
            "name" => FieldValue::Text(self.name.clone()),
            "extension" => FieldValue::Text(self.extension.clone()),
            "isDirectory" => FieldValue::Bool(self.is_directory),
            "icon" => FieldValue::Text(self.icon.clone()),
            "iconAlt" => self
                .icon_alt
                .clone()
                .map_or(FieldValue::Missing, FieldValue::Text),
            "iconType" => FieldValue::Text(self.icon_type.clone()),
            "size" => self.size.into(),
            "date" => self.date.into(),
            "attributes" => FieldValue::Text(self.attributes.clone()),
            "isActive" => FieldValue::Bool(self.is_active),
            _ => FieldValue::Missing,
        }
    }
}

/// A plain string exposes itself as `name`
impl Record for String {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::Text(self.clone()),
            _ => FieldValue::Missing,
        }
    }
}

/// Presentation transforms available to slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTransform {
    /// Human-readable size from `isDirectory` and `size`
    Size,
    /// `YYYY-MM-DD HH:MM` from `date` (ms since epoch)
    Date,
    /// Icon from `icon`, `iconAlt` and `isDirectory`
    Icon,
    /// `name` with the prefixes listed in `matchedKey` emphasized
    Match,
}

/// Where a slot takes its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSource {
    Field(String),
    Transform(FieldTransform),
}

/// Slot width specification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotWidth {
    /// Fixed width in pixels
    Fixed(f32),
    /// Flexible width with optional min/max
    Flex { min: Option<f32>, max: Option<f32> },
    /// Percentage of available space
    Percent(f32),
}

impl Default for SlotWidth {
    fn default() -> Self {
        SlotWidth::Flex { min: None, max: None }
    }
}

/// Binding of one template slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBinding {
    /// Slot identifier
    pub id: String,
    /// Header label
    pub label: String,
    pub source: SlotSource,
    pub width: SlotWidth,
}

impl SlotBinding {
    /// Slot showing a record field as text
    pub fn field(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            source: SlotSource::Field(field.into()),
            width: SlotWidth::default(),
        }
    }

    /// Slot showing a transform of the record
    pub fn transform(id: impl Into<String>, transform: FieldTransform) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            source: SlotSource::Transform(transform),
            width: SlotWidth::default(),
        }
    }

    /// Set the header label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set fixed width
    pub fn fixed_width(mut self, width: f32) -> Self {
        self.width = SlotWidth::Fixed(width);
        self
    }

    /// Set flexible width with optional constraints
    pub fn flex_width(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.width = SlotWidth::Flex { min, max };
        self
    }

    /// Set percentage width
    pub fn percent_width(mut self, percent: f32) -> Self {
        self.width = SlotWidth::Percent(percent);
        self
    }
}

/// What an icon slot currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum IconSlot {
    /// Bundled icon, used when no backing service is attached
    Builtin(&'static str),
    /// Icon URL without an alternate
    Url(String),
    /// Primary icon already resolved
    Cached { url: String, icon: IconResource },
    /// Alternate shown while `primary` loads
    Pending { showing: String, primary: String },
}

impl IconSlot {
    /// Primary URL still to be loaded
    pub fn pending_url(&self) -> Option<&str> {
        match self {
            IconSlot::Pending { primary, .. } => Some(primary),
            _ => None,
        }
    }
}

/// Presentation value of a bound slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Text(String),
    Highlight(Vec<HighlightSpan>),
    Icon(IconSlot),
}

impl SlotValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A slot after binding
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSlot {
    pub id: String,
    pub value: SlotValue,
}

/// Ambient inputs of the transforms
pub struct BindContext<'a> {
    /// Backing service base URI; `None` selects built-in icons
    pub icon_base: Option<&'a str>,
    pub icons: &'a IconCache,
}

impl FieldTransform {
    /// Apply the transform; never fails, anomalies map to sentinels
    pub fn apply<R: Record + ?Sized>(&self, record: &R, cx: &BindContext<'_>) -> SlotValue {
        match self {
            FieldTransform::Size => SlotValue::Text(format_size(
                record.field("isDirectory").as_bool(),
                record.field("size").as_number(),
            )),
            FieldTransform::Date => SlotValue::Text(format_date(record.field("date").as_number())),
            FieldTransform::Icon => SlotValue::Icon(bind_icon(record, cx)),
            FieldTransform::Match => {
                let name = record.field("name").to_text();
                let matched = match record.field("matchedKey") {
                    FieldValue::Words(words) => words,
                    _ => Vec::new(),
                };
                SlotValue::Highlight(highlight_words(&name, &matched))
            }
        }
    }
}

fn bind_icon<R: Record + ?Sized>(record: &R, cx: &BindContext<'_>) -> IconSlot {
    let builtin = if record.field("isDirectory").as_bool() {
        BUILTIN_FOLDER_ICON
    } else {
        BUILTIN_FILE_ICON
    };
    let Some(base) = cx.icon_base else {
        return IconSlot::Builtin(builtin);
    };
    let icon = record.field("icon").to_text();
    if icon.is_empty() {
        return IconSlot::Builtin(builtin);
    }

    let url = format!("{base}/icons/{icon}");
    match record.field("iconAlt") {
        FieldValue::Text(alt) if !alt.is_empty() => match cx.icons.get(&url) {
            Some(resolved) => IconSlot::Cached {
                url,
                icon: resolved.clone(),
            },
            None => IconSlot::Pending {
                showing: format!("{base}/icons/{alt}"),
                primary: url,
            },
        },
        _ => IconSlot::Url(url),
    }
}

/// Declarative row template: fixed row height plus slot bindings
#[derive(Debug, Clone, PartialEq)]
pub struct RowTemplate {
    row_height: f64,
    slots: Vec<SlotBinding>,
}

impl RowTemplate {
    pub fn new(row_height: f64) -> Self {
        Self {
            row_height,
            slots: Vec::new(),
        }
    }

    /// Append a slot binding
    pub fn slot(mut self, binding: SlotBinding) -> Self {
        self.slots.push(binding);
        self
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn slots(&self) -> &[SlotBinding] {
        &self.slots
    }

    /// Check the structural preconditions of a template
    pub fn validate(&self) -> Result<()> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(Error::Template {
                message: format!("row height must be positive, got {}", self.row_height),
            });
        }
        if self.slots.is_empty() {
            return Err(Error::Template {
                message: "row template has no slots".to_string(),
            });
        }
        Ok(())
    }

    /// Fail unless every slot in `ids` is present
    pub fn require_slots(&self, ids: &[&str]) -> Result<()> {
        match ids
            .iter()
            .find(|id| !self.slots.iter().any(|slot| slot.id == **id))
        {
            Some(missing) => Err(Error::Template {
                message: format!("required slot '{missing}' not found in row template"),
            }),
            None => Ok(()),
        }
    }

    /// Bind a record into slot values
    pub fn bind<R: Record + ?Sized>(&self, record: &R, cx: &BindContext<'_>) -> Vec<BoundSlot> {
        self.slots
            .iter()
            .map(|slot| BoundSlot {
                id: slot.id.clone(),
                value: match &slot.source {
                    SlotSource::Field(field) => SlotValue::Text(record.field(field).to_text()),
                    SlotSource::Transform(transform) => transform.apply(record, cx),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::icon::IconFormat;

    fn file_template() -> RowTemplate {
        RowTemplate::new(20.0)
            .slot(SlotBinding::transform("icon", FieldTransform::Icon))
            .slot(SlotBinding::field("name", "name"))
            .slot(SlotBinding::field("ext", "extension"))
            .slot(SlotBinding::transform("size", FieldTransform::Size))
            .slot(SlotBinding::transform("date", FieldTransform::Date))
    }

    fn value<'a>(slots: &'a [BoundSlot], id: &str) -> &'a SlotValue {
        &slots
            .iter()
            .find(|slot| slot.id == id)
            .expect("slot present")
            .value
    }

    #[test]
    fn test_validate() {
        assert!(file_template().validate().is_ok());
        assert!(matches!(
            RowTemplate::new(20.0).validate(),
            Err(Error::Template { .. })
        ));
        assert!(matches!(
            RowTemplate::new(0.0)
                .slot(SlotBinding::field("name", "name"))
                .validate(),
            Err(Error::Template { .. })
        ));
    }

    #[test]
    fn test_require_slots() {
        let template = file_template();
        assert!(template.require_slots(&["name", "size"]).is_ok());
        let err = template.require_slots(&["name", "attributes"]).expect_err("missing");
        assert!(err.to_string().contains("attributes"));
    }

    #[test]
    fn test_bind_file_without_service() {
        let cache = IconCache::new(4);
        let cx = BindContext {
            icon_base: None,
            icons: &cache,
        };
        let mut file = FileInfo::file("notes", "txt");
        file.size = Some(2048.0);
        file.date = None;

        let slots = file_template().bind(&file, &cx);
        assert_eq!(value(&slots, "icon"), &SlotValue::Icon(IconSlot::Builtin("file.svg")));
        assert_eq!(value(&slots, "name").as_text(), Some("notes"));
        assert_eq!(value(&slots, "ext").as_text(), Some("txt"));
        assert_eq!(value(&slots, "size").as_text(), Some("2.00 KiB"));
        assert_eq!(value(&slots, "date").as_text(), Some("-"));
    }

    #[test]
    fn test_bind_tolerates_bad_fields() {
        let cache = IconCache::new(4);
        let cx = BindContext {
            icon_base: Some("http://svc"),
            icons: &cache,
        };
        let mut file = FileInfo::file("x", "");
        file.size = Some(-5.0);
        file.icon = String::new();

        let slots = file_template().bind(&file, &cx);
        assert_eq!(value(&slots, "size").as_text(), Some("???"));
        assert_eq!(value(&slots, "icon"), &SlotValue::Icon(IconSlot::Builtin("file.svg")));
    }

    #[test]
    fn test_icon_pending_then_cached() {
        let mut cache = IconCache::new(4);
        let mut dir = FileInfo::directory("src");
        dir.icon = "folder?path=%2Fsrc".to_string();
        dir.icon_alt = Some("folder".to_string());

        let pending = FieldTransform::Icon.apply(
            &dir,
            &BindContext {
                icon_base: Some("http://svc"),
                icons: &cache,
            },
        );
        assert_eq!(
            pending,
            SlotValue::Icon(IconSlot::Pending {
                showing: "http://svc/icons/folder".to_string(),
                primary: "http://svc/icons/folder?path=%2Fsrc".to_string(),
            })
        );

        let resolved = IconResource::new(IconFormat::Png, vec![1, 2, 3]);
        cache.insert("http://svc/icons/folder?path=%2Fsrc", resolved.clone());
        let cached = FieldTransform::Icon.apply(
            &dir,
            &BindContext {
                icon_base: Some("http://svc"),
                icons: &cache,
            },
        );
        assert_eq!(
            cached,
            SlotValue::Icon(IconSlot::Cached {
                url: "http://svc/icons/folder?path=%2Fsrc".to_string(),
                icon: resolved,
            })
        );
    }

    #[test]
    fn test_icon_without_alternate_is_plain_url() {
        let cache = IconCache::new(4);
        let file = FileInfo::file("a", "rs");
        let slot = FieldTransform::Icon.apply(
            &file,
            &BindContext {
                icon_base: Some("http://svc"),
                icons: &cache,
            },
        );
        assert_eq!(slot, SlotValue::Icon(IconSlot::Url("http://svc/icons/file".to_string())));
    }

    #[test]
    fn test_number_to_text() {
        assert_eq!(FieldValue::Number(12.0).to_text(), "12");
        assert_eq!(FieldValue::Number(1.5).to_text(), "1.5");
        assert_eq!(FieldValue::Missing.to_text(), "");
    }
}
