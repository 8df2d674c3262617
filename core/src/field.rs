//! Per-field wire directives and the tables that hold them.
//!
//! # Design
//! Every request type declares one [`FieldTable`], built once on first use
//! and shared read-only afterwards. A table lists the type's fields in
//! declaration order; each field carries its [`FieldKind`], validation
//! [`Rule`]s, and one directive string per [`Channel`] (optionally pinned
//! to a [`SchemaVersion`]). Directive strings have the shape
//! `wire-name[,optional]`, or `-` to exclude the field from a channel.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::validate::Rule;

/// A named set of directives on one type, selected per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel(&'static str);

impl Channel {
    pub const ADD: Channel = Channel("add");
    pub const MODIFY: Channel = Channel("modify");
    pub const SEARCH: Channel = Channel("search");
    pub const DETAILS: Channel = Channel("details");
    pub const SIGNUP: Channel = Channel("signup");

    pub const fn named(name: &'static str) -> Self {
        Channel(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Revision of the upstream schema a directive applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SchemaVersion {
    #[default]
    V1,
    V2,
}

impl SchemaVersion {
    /// Versioned namespace path, e.g. `customers` or `customers/v2`.
    pub fn namespace(&self, base: &str) -> String {
        match self {
            SchemaVersion::V1 => base.to_string(),
            SchemaVersion::V2 => format!("{base}/v2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Slice,
    Nested,
}

/// Errors raised while building a [`FieldTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("directive {0:?} has an empty wire name")]
    EmptyWireName(String),

    #[error("directive {tag:?} has unknown option {option:?}")]
    UnknownOption { tag: String, option: String },

    #[error("field {0} is declared twice")]
    DuplicateField(&'static str),

    #[error("directive for channel {0} declared before any field")]
    OrphanDirective(Channel),

    #[error("field {field} has two directives for channel {channel}")]
    DuplicateDirective { field: &'static str, channel: Channel },

    #[error("exactly-one-of group names unknown field {0}")]
    UnknownGroupField(&'static str),
}

/// One parsed directive string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Include { wire_name: String, required: bool },
    Exclude,
}

impl FromStr for Directive {
    type Err = TagError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if tag == "-" {
            return Ok(Directive::Exclude);
        }

        let mut parts = tag.split(',');
        let wire_name = parts.next().unwrap_or_default().trim();
        if wire_name.is_empty() {
            return Err(TagError::EmptyWireName(tag.to_string()));
        }

        let mut required = true;
        for option in parts {
            match option.trim() {
                "optional" | "omitempty" => required = false,
                other => {
                    return Err(TagError::UnknownOption {
                        tag: tag.to_string(),
                        option: other.to_string(),
                    })
                }
            }
        }

        Ok(Directive::Include {
            wire_name: wire_name.to_string(),
            required,
        })
    }
}

/// The resolved directive of one field for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<'a> {
    pub field: &'static str,
    pub wire_name: &'a str,
    pub required: bool,
    pub kind: FieldKind,
    pub channel: Channel,
}

#[derive(Debug)]
struct ChannelDirective {
    channel: Channel,
    version: Option<SchemaVersion>,
    directive: Directive,
}

#[derive(Debug)]
pub(crate) struct FieldDecl {
    pub(crate) name: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) rules: Vec<Rule>,
    directives: Vec<ChannelDirective>,
}

impl FieldDecl {
    fn directive(&self, channel: Channel, version: SchemaVersion) -> Option<&Directive> {
        let mut fallback = None;
        for d in self.directives.iter().filter(|d| d.channel == channel) {
            match d.version {
                Some(v) if v == version => return Some(&d.directive),
                Some(_) => {}
                None => fallback = Some(&d.directive),
            }
        }
        fallback
    }
}

/// The directive table of one request type.
#[derive(Debug)]
pub struct FieldTable {
    fields: Vec<FieldDecl>,
    exactly_one_of: Vec<Vec<&'static str>>,
}

impl FieldTable {
    pub fn builder() -> FieldTableBuilder {
        FieldTableBuilder::default()
    }

    /// Directive of `field` for `channel` under `version`, or `None` when the
    /// field is undeclared, has no directive for the channel, or is excluded.
    pub fn spec(
        &self,
        field: &str,
        channel: Channel,
        version: SchemaVersion,
    ) -> Option<FieldSpec<'_>> {
        let decl = self.decl(field)?;
        match decl.directive(channel, version)? {
            Directive::Exclude => None,
            Directive::Include {
                wire_name,
                required,
            } => Some(FieldSpec {
                field: decl.name,
                wire_name,
                required: *required,
                kind: decl.kind,
                channel,
            }),
        }
    }

    /// All active directives for `channel`, in declaration order.
    pub fn specs(&self, channel: Channel, version: SchemaVersion) -> Vec<FieldSpec<'_>> {
        self.fields
            .iter()
            .filter_map(|decl| self.spec(decl.name, channel, version))
            .collect()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|decl| decl.name).collect()
    }

    pub(crate) fn decl(&self, field: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|decl| decl.name == field)
    }

    pub(crate) fn exactly_one_of_groups(&self) -> &[Vec<&'static str>] {
        &self.exactly_one_of
    }
}

/// Incremental [`FieldTable`] construction. `on`, `on_version` and `rule`
/// apply to the most recently declared field.
#[derive(Debug, Default)]
pub struct FieldTableBuilder {
    fields: Vec<FieldDecl>,
    exactly_one_of: Vec<Vec<&'static str>>,
    error: Option<TagError>,
}

impl FieldTableBuilder {
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        if self.fields.iter().any(|decl| decl.name == name) {
            self.fail(TagError::DuplicateField(name));
        }
        self.fields.push(FieldDecl {
            name,
            kind,
            rules: Vec::new(),
            directives: Vec::new(),
        });
        self
    }

    pub fn scalar(self, name: &'static str) -> Self {
        self.field(name, FieldKind::Scalar)
    }

    pub fn slice(self, name: &'static str) -> Self {
        self.field(name, FieldKind::Slice)
    }

    pub fn nested(self, name: &'static str) -> Self {
        self.field(name, FieldKind::Nested)
    }

    /// Directive for `channel` under every schema version.
    pub fn on(self, channel: Channel, tag: &str) -> Self {
        self.push_directive(channel, None, tag)
    }

    /// Directive for `channel` under one schema version only.
    pub fn on_version(self, channel: Channel, version: SchemaVersion, tag: &str) -> Self {
        self.push_directive(channel, Some(version), tag)
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        if let Some(decl) = self.fields.last_mut() {
            decl.rules.push(rule);
        }
        self
    }

    /// Cross-field constraint: exactly one of `fields` must be non-zero.
    pub fn exactly_one_of(mut self, fields: &[&'static str]) -> Self {
        self.exactly_one_of.push(fields.to_vec());
        self
    }

    pub fn build(self) -> Result<FieldTable, TagError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        for group in &self.exactly_one_of {
            if let Some(missing) = group
                .iter()
                .find(|name| !self.fields.iter().any(|decl| decl.name == **name))
            {
                return Err(TagError::UnknownGroupField(missing));
            }
        }
        Ok(FieldTable {
            fields: self.fields,
            exactly_one_of: self.exactly_one_of,
        })
    }

    fn push_directive(
        mut self,
        channel: Channel,
        version: Option<SchemaVersion>,
        tag: &str,
    ) -> Self {
        let directive = match tag.parse::<Directive>() {
            Ok(directive) => directive,
            Err(err) => {
                self.fail(err);
                return self;
            }
        };
        let Some(decl) = self.fields.last_mut() else {
            self.fail(TagError::OrphanDirective(channel));
            return self;
        };
        if decl
            .directives
            .iter()
            .any(|d| d.channel == channel && d.version == version)
        {
            let field = decl.name;
            self.fail(TagError::DuplicateDirective { field, channel });
            return self;
        }
        decl.directives.push(ChannelDirective {
            channel,
            version,
            directive,
        });
        self
    }

    fn fail(&mut self, err: TagError) {
        self.error.get_or_insert(err);
    }
}
