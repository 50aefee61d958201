// File: src/messages.rs
// Purpose: Default message templates, override precedence, attribute display names

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// Message overrides keyed by `rule`, `rule.kind`, `field.rule` or `field.rule.kind`
pub type Messages = BTreeMap<String, String>;

/// Custom attribute display names keyed by field
pub type Attributes = BTreeMap<String, String>;

/// Used when neither an override nor a builtin template exists
pub const GENERIC_MESSAGE: &str = "The :attribute field is invalid.";

/// Rules whose message depends on what kind of value the field holds
const SIZE_RULES: &[&str] = &["between", "gt", "gte", "lt", "lte", "max", "min", "size"];

/// What a size rule measures on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    Numeric,
    File,
    String,
    Array,
}

impl SizeKind {
    /// Infer the kind from the other rules on the field
    pub fn for_rules<'a>(rule_names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind = SizeKind::String;
        for name in rule_names {
            match name {
                "numeric" | "integer" | "decimal" => return SizeKind::Numeric,
                "array" => kind = SizeKind::Array,
                "file" | "image" | "mimes" | "mimetypes" if kind == SizeKind::String => {
                    kind = SizeKind::File
                }
                _ => {}
            }
        }
        kind
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKind::Numeric => "numeric",
            SizeKind::File => "file",
            SizeKind::String => "string",
            SizeKind::Array => "array",
        }
    }
}

enum Template {
    Plain(&'static str),
    BySize {
        numeric: &'static str,
        file: &'static str,
        string: &'static str,
        array: &'static str,
    },
}

impl Template {
    fn for_kind(&self, kind: SizeKind) -> &'static str {
        match self {
            Template::Plain(text) => *text,
            Template::BySize {
                numeric,
                file,
                string,
                array,
            } => match kind {
                SizeKind::Numeric => *numeric,
                SizeKind::File => *file,
                SizeKind::String => *string,
                SizeKind::Array => *array,
            },
        }
    }
}

static DEFAULT_MESSAGES: Lazy<HashMap<&'static str, Template>> = Lazy::new(|| {
    use Template::{Plain, BySize};

    let mut m = HashMap::new();
    m.insert("accepted", Plain("The :attribute must be accepted."));
    m.insert("active_url", Plain("The :attribute is not a valid URL."));
    m.insert("after", Plain("The :attribute must be a date after :date."));
    m.insert("after_or_equal", Plain("The :attribute must be a date after or equal to :date."));
    m.insert("alpha", Plain("The :attribute may only contain letters."));
    m.insert("alpha_dash", Plain("The :attribute may only contain letters, numbers, dashes and underscores."));
    m.insert("alpha_num", Plain("The :attribute may only contain letters and numbers."));
    m.insert("array", Plain("The :attribute must be an array."));
    m.insert("before", Plain("The :attribute must be a date before :date."));
    m.insert("before_or_equal", Plain("The :attribute must be a date before or equal to :date."));
    m.insert(
        "between",
        BySize {
            numeric: "The :attribute must be between :min and :max.",
            file: "The :attribute must be between :min and :max kilobytes.",
            string: "The :attribute must be between :min and :max characters.",
            array: "The :attribute must have between :min and :max items.",
        },
    );
    m.insert("boolean", Plain("The :attribute field must be true or false."));
    m.insert("confirmed", Plain("The :attribute confirmation does not match."));
    m.insert("current_password", Plain("The password is incorrect."));
    m.insert("date", Plain("The :attribute is not a valid date."));
    m.insert("date_equals", Plain("The :attribute must be a date equal to :date."));
    m.insert("date_format", Plain("The :attribute does not match the format :format."));
    m.insert("different", Plain("The :attribute and :other must be different."));
    m.insert("digits", Plain("The :attribute must be :digits digits."));
    m.insert("digits_between", Plain("The :attribute must be between :min and :max digits."));
    m.insert("email", Plain("The :attribute must be a valid email address."));
    m.insert("exists", Plain("The selected :attribute is invalid."));
    m.insert("file", Plain("The :attribute must be a file."));
    m.insert("filled", Plain("The :attribute field must have a value."));
    m.insert(
        "gt",
        BySize {
            numeric: "The :attribute must be greater than :value.",
            file: "The :attribute must be greater than :value kilobytes.",
            string: "The :attribute must be greater than :value characters.",
            array: "The :attribute must have more than :value items.",
        },
    );
    m.insert(
        "gte",
        BySize {
            numeric: "The :attribute must be greater than or equal :value.",
            file: "The :attribute must be greater than or equal :value kilobytes.",
            string: "The :attribute must be greater than or equal :value characters.",
            array: "The :attribute must have :value items or more.",
        },
    );
    m.insert("image", Plain("The :attribute must be an image."));
    m.insert("in", Plain("The selected :attribute is invalid."));
    m.insert("integer", Plain("The :attribute must be an integer."));
    m.insert("ip", Plain("The :attribute must be a valid IP address."));
    m.insert("ipv4", Plain("The :attribute must be a valid IPv4 address."));
    m.insert("ipv6", Plain("The :attribute must be a valid IPv6 address."));
    m.insert("json", Plain("The :attribute must be a valid JSON string."));
    m.insert(
        "lt",
        BySize {
            numeric: "The :attribute must be less than :value.",
            file: "The :attribute must be less than :value kilobytes.",
            string: "The :attribute must be less than :value characters.",
            array: "The :attribute must have less than :value items.",
        },
    );
    m.insert(
        "lte",
        BySize {
            numeric: "The :attribute must be less than or equal :value.",
            file: "The :attribute must be less than or equal :value kilobytes.",
            string: "The :attribute must be less than or equal :value characters.",
            array: "The :attribute must not have more than :value items.",
        },
    );
    m.insert(
        "max",
        BySize {
            numeric: "The :attribute may not be greater than :max.",
            file: "The :attribute may not be greater than :max kilobytes.",
            string: "The :attribute may not be greater than :max characters.",
            array: "The :attribute may not have more than :max items.",
        },
    );
    m.insert("mimes", Plain("The :attribute must be a file of type: :values."));
    m.insert("mimetypes", Plain("The :attribute must be a file of type: :values."));
    m.insert(
        "min",
        BySize {
            numeric: "The :attribute must be at least :min.",
            file: "The :attribute must be at least :min kilobytes.",
            string: "The :attribute must be at least :min characters.",
            array: "The :attribute must have at least :min items.",
        },
    );
    m.insert("not_in", Plain("The selected :attribute is invalid."));
    m.insert("not_regex", Plain("The :attribute format is invalid."));
    m.insert("numeric", Plain("The :attribute must be a number."));
    m.insert("password", Plain("The password is incorrect."));
    m.insert("present", Plain("The :attribute field must be present."));
    m.insert("regex", Plain("The :attribute format is invalid."));
    m.insert("required", Plain("The :attribute field is required."));
    m.insert("required_if", Plain("The :attribute field is required when :other is :value."));
    m.insert("required_unless", Plain("The :attribute field is required unless :other is in :values."));
    m.insert("required_with", Plain("The :attribute field is required when :values is present."));
    m.insert("required_with_all", Plain("The :attribute field is required when :values are present."));
    m.insert("required_without", Plain("The :attribute field is required when :values is not present."));
    m.insert("required_without_all", Plain("The :attribute field is required when none of :values are present."));
    m.insert("same", Plain("The :attribute and :other must match."));
    m.insert(
        "size",
        BySize {
            numeric: "The :attribute must be :size.",
            file: "The :attribute must be :size kilobytes.",
            string: "The :attribute must be :size characters.",
            array: "The :attribute must contain :size items.",
        },
    );
    m.insert("string", Plain("The :attribute must be a string."));
    m.insert("timezone", Plain("The :attribute must be a valid zone."));
    m.insert("unique", Plain("The :attribute has already been taken."));
    m.insert("url", Plain("The :attribute format is invalid."));
    m.insert("uuid", Plain("The :attribute must be a valid UUID."));
    m
});

pub fn is_size_rule(rule: &str) -> bool {
    SIZE_RULES.contains(&rule)
}

/// Resolve the message template for `rule` on `field`
///
/// Precedence: `field.rule[.kind]` override, then `rule[.kind]` override,
/// then the builtin template, then [`GENERIC_MESSAGE`]. Placeholders are
/// left for the renderer to expand.
pub fn resolve_message(field: &str, rule: &str, kind: SizeKind, overrides: &Messages) -> String {
    let sized = is_size_rule(rule);

    let mut candidates = Vec::with_capacity(4);
    if sized {
        candidates.push(format!("{}.{}.{}", field, rule, kind.as_str()));
    }
    candidates.push(format!("{}.{}", field, rule));
    if sized {
        candidates.push(format!("{}.{}", rule, kind.as_str()));
    }
    candidates.push(rule.to_string());

    if let Some(message) = candidates.iter().find_map(|key| overrides.get(key)) {
        return message.clone();
    }

    DEFAULT_MESSAGES
        .get(rule)
        .map(|template| template.for_kind(kind))
        .unwrap_or(GENERIC_MESSAGE)
        .to_string()
}

/// Human readable name for a field
///
/// Custom attributes win; otherwise the last `.` segment with `_` as spaces.
pub fn display_name(field: &str, attributes: &Attributes) -> String {
    if let Some(name) = attributes.get(field) {
        return name.clone();
    }

    field
        .rsplit('.')
        .next()
        .unwrap_or(field)
        .replace('_', " ")
}
