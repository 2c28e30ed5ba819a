//! Declarative request schemas.
//!
//! A [`Schema`] is an ordered list of [`FieldSchema`]s plus [`ConditionalRule`]s. Each
//! field carries a [`FieldKind`], one variant per value shape, and each variant owns
//! its constraint set. Rules are plain data interpreted by the validator in
//! [`validate`].
//!
//! # Examples
//!
//! ```
//! use barion::schema::{ConditionalRule, FieldSchema, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new("Example")
//!     .field(FieldSchema::string("PaymentType").required().one_of(&["Immediate", "Reservation"]))
//!     .field(FieldSchema::string("ReservationPeriod"))
//!     .rule(ConditionalRule::when("PaymentType", [json!("Reservation")]).then_required("ReservationPeriod"));
//!
//! let candidate = json!({ "PaymentType": "Reservation" });
//! let errors = schema.validate(candidate.as_object().unwrap()).unwrap_err();
//! assert_eq!(errors.messages(), ["\"ReservationPeriod\" is required"]);
//! ```

pub mod validate;

use std::{fmt, sync::Arc};

use regex::Regex;
use serde_json::{Map, Value};

use crate::{error::ValidationErrors, merchant::field_map::FieldIndex};

/// Whether a field must, may, or must not be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The field must be present and non-null.
    Required,
    /// The field may be omitted.
    Optional,
    /// The field must not be supplied.
    Forbidden,
    /// The field must not be supplied because it may only come from client configuration.
    Immutable,
}

/// Named regular expression used as a string constraint.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: &'static Regex,
    description: &'static str,
}

impl Pattern {
    /// Creates a pattern; `description` completes the sentence "must be ...".
    #[must_use]
    pub fn new(regex: &'static Regex, description: &'static str) -> Self {
        Self { regex, description }
    }

    /// Returns true if the value matches.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }
}

/// Constraints on string values.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    /// Minimum length in characters.
    pub min_len: Option<usize>,
    /// Maximum length in characters.
    pub max_len: Option<usize>,
    /// Accepted literal values; empty means any value.
    pub one_of: Vec<&'static str>,
    /// Pattern the value must match.
    pub pattern: Option<Pattern>,
    /// Whether the value must look like an email address.
    pub email: bool,
}

/// Constraints on numeric values.
#[derive(Debug, Clone, Default)]
pub struct NumberRules {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Exclusive lower bound.
    pub greater_than: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
    /// Whether fractional values are rejected.
    pub integer: bool,
}

/// Constraints on array values.
#[derive(Debug, Clone)]
pub struct ArrayRules {
    /// Kind every element must have.
    pub items: Box<FieldKind>,
    /// Minimum number of elements.
    pub min_items: Option<usize>,
    /// Maximum number of elements.
    pub max_items: Option<usize>,
}

/// Shape of a field's value together with its constraints.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// JSON string.
    String(StringRules),
    /// JSON number; numeric strings are coerced.
    Number(NumberRules),
    /// JSON boolean; `"true"`/`"false"` strings are coerced.
    Boolean,
    /// Date or date-time string, normalized to RFC 3339 UTC.
    Date,
    /// JSON array whose elements share one kind.
    Array(ArrayRules),
    /// Nested object validated against its own schema.
    Object(Arc<Schema>),
}

impl FieldKind {
    /// Unconstrained string kind.
    #[must_use]
    pub fn string() -> Self {
        Self::String(StringRules::default())
    }

    /// String kind restricted to the given literals.
    #[must_use]
    pub fn enumeration(values: &[&'static str]) -> Self {
        Self::String(StringRules { one_of: values.to_vec(), ..StringRules::default() })
    }

    /// Nested object kind.
    #[must_use]
    pub fn object(schema: Schema) -> Self {
        Self::Object(Arc::new(schema))
    }
}

/// One named value of a request.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: &'static str,
    kind: FieldKind,
    presence: Presence,
    default: Option<Value>,
}

impl FieldSchema {
    /// Declares an optional field of the given kind.
    #[must_use]
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, presence: Presence::Optional, default: None }
    }

    /// Declares an optional string field.
    #[must_use]
    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::string())
    }

    /// Declares an optional number field.
    #[must_use]
    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number(NumberRules::default()))
    }

    /// Declares an optional boolean field.
    #[must_use]
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Declares an optional date field.
    #[must_use]
    pub fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Declares an optional array field.
    #[must_use]
    pub fn array(name: &'static str, items: FieldKind) -> Self {
        Self::new(
            name,
            FieldKind::Array(ArrayRules { items: Box::new(items), min_items: None, max_items: None }),
        )
    }

    /// Declares an optional nested object field.
    #[must_use]
    pub fn object(name: &'static str, schema: Schema) -> Self {
        Self::new(name, FieldKind::object(schema))
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Sets the value used when the field is absent.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Restricts a string field to the given literals. No-op for other kinds.
    #[must_use]
    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.one_of = values.to_vec();
        }
        self
    }

    /// Sets the minimum length of a string field. No-op for other kinds.
    #[must_use]
    pub fn min_len(mut self, len: usize) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.min_len = Some(len);
        }
        self
    }

    /// Sets the maximum length of a string field. No-op for other kinds.
    #[must_use]
    pub fn max_len(mut self, len: usize) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.max_len = Some(len);
        }
        self
    }

    /// Requires a string field to match a pattern. No-op for other kinds.
    #[must_use]
    pub fn pattern(mut self, regex: &'static Regex, description: &'static str) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.pattern = Some(Pattern::new(regex, description));
        }
        self
    }

    /// Requires a string field to be an email address. No-op for other kinds.
    #[must_use]
    pub fn email(mut self) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.email = true;
        }
        self
    }

    /// Sets an inclusive lower bound on a number field. No-op for other kinds.
    #[must_use]
    pub fn min(mut self, bound: f64) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.min = Some(bound);
        }
        self
    }

    /// Sets an exclusive lower bound on a number field. No-op for other kinds.
    #[must_use]
    pub fn greater_than(mut self, bound: f64) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.greater_than = Some(bound);
        }
        self
    }

    /// Sets an inclusive upper bound on a number field. No-op for other kinds.
    #[must_use]
    pub fn max(mut self, bound: f64) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.max = Some(bound);
        }
        self
    }

    /// Rejects fractional values of a number field. No-op for other kinds.
    #[must_use]
    pub fn integer(mut self) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.integer = true;
        }
        self
    }

    /// Sets the minimum element count of an array field. No-op for other kinds.
    #[must_use]
    pub fn min_items(mut self, count: usize) -> Self {
        if let FieldKind::Array(rules) = &mut self.kind {
            rules.min_items = Some(count);
        }
        self
    }

    /// Sets the maximum element count of an array field. No-op for other kinds.
    #[must_use]
    pub fn max_items(mut self, count: usize) -> Self {
        if let FieldKind::Array(rules) = &mut self.kind {
            rules.max_items = Some(count);
        }
        self
    }

    /// Canonical field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Value shape and constraints.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Declared presence.
    #[must_use]
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Value used when the field is absent.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// "If `when_field` equals one of `when_values`, `then_field` becomes `then`."
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    /// Field whose value is inspected.
    pub when_field: &'static str,
    /// Values that trigger the rule.
    pub when_values: Vec<Value>,
    /// Field whose presence changes.
    pub then_field: &'static str,
    /// Presence applied when the rule triggers.
    pub then: Presence,
}

impl ConditionalRule {
    /// Starts a rule on the given field and trigger values.
    #[must_use]
    pub fn when<I>(field: &'static str, values: I) -> RuleBuilder
    where
        I: IntoIterator<Item = Value>,
    {
        RuleBuilder { when_field: field, when_values: values.into_iter().collect() }
    }

    /// Returns true if the rule triggers for the given value of `when_field`.
    #[must_use]
    pub fn triggers(&self, value: &Value) -> bool {
        self.when_values.contains(value)
    }
}

/// Partially built [`ConditionalRule`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    when_field: &'static str,
    when_values: Vec<Value>,
}

impl RuleBuilder {
    /// The target field becomes required.
    #[must_use]
    pub fn then_required(self, field: &'static str) -> ConditionalRule {
        self.then(field, Presence::Required)
    }

    /// The target field becomes forbidden.
    #[must_use]
    pub fn then_forbidden(self, field: &'static str) -> ConditionalRule {
        self.then(field, Presence::Forbidden)
    }

    fn then(self, field: &'static str, presence: Presence) -> ConditionalRule {
        ConditionalRule {
            when_field: self.when_field,
            when_values: self.when_values,
            then_field: field,
            then: presence,
        }
    }
}

/// Ordered field declarations plus conditional rules for one request object.
#[derive(Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSchema>,
    rules: Vec<ConditionalRule>,
    index: FieldIndex,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, fields: Vec::new(), rules: Vec::new(), index: FieldIndex::default() }
    }

    /// Appends a field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self.reindex();
        self
    }

    /// Appends a conditional rule.
    #[must_use]
    pub fn rule(mut self, rule: ConditionalRule) -> Self {
        self.rules.push(rule);
        self
    }

    fn reindex(&mut self) {
        self.index = FieldIndex::new(self.fields.iter().map(FieldSchema::name));
    }

    /// Schema name, used in log output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field declarations in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Conditional rules in order.
    #[must_use]
    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    /// Canonical names of all declared fields, in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldSchema::name).collect()
    }

    /// Looks up a field declaration by canonical name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        let canonical = self.index.canonical(name)?;
        self.fields.iter().find(|field| field.name == canonical)
    }

    /// Index mapping caller keys onto this schema's canonical names.
    #[must_use]
    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    /// Returns a copy where the named fields are optional and carry no default.
    ///
    /// Conditional rules that would make one of those fields required are dropped too,
    /// so the copy accepts partial input.
    #[must_use]
    pub fn with_optional(&self, names: &[&str]) -> Self {
        let mut relaxed = self.clone();
        for field in &mut relaxed.fields {
            if names.iter().any(|name| field.name.eq_ignore_ascii_case(name)) {
                field.presence = Presence::Optional;
                field.default = None;
            }
        }
        relaxed.rules.retain(|rule| {
            rule.then != Presence::Required
                || !names.iter().any(|name| rule.then_field.eq_ignore_ascii_case(name))
        });
        relaxed
    }

    /// Returns a copy where the named fields are forbidden.
    #[must_use]
    pub fn with_forbidden(&self, names: &[&str]) -> Self {
        self.with_presence(names, Presence::Forbidden)
    }

    /// Returns a copy where the named fields are rejected as immutable.
    #[must_use]
    pub fn with_immutable(&self, names: &[&str]) -> Self {
        self.with_presence(names, Presence::Immutable)
    }

    fn with_presence(&self, names: &[&str], presence: Presence) -> Self {
        let mut derived = self.clone();
        for field in &mut derived.fields {
            if names.iter().any(|name| field.name.eq_ignore_ascii_case(name)) {
                field.presence = presence;
                field.default = None;
            }
        }
        derived
    }

    /// Validates and sanitizes a candidate object.
    ///
    /// Returns exactly the declared fields, coerced, with defaults applied, or every
    /// violation found.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing one message per violated constraint.
    pub fn validate(
        &self,
        candidate: &Map<String, Value>,
    ) -> std::result::Result<Map<String, Value>, ValidationErrors> {
        validate::validate(self, candidate)
    }

    /// Checks the structural invariants of this schema and its nested schemas.
    ///
    /// Field names must be unique ignoring case, and rules may only reference declared
    /// fields. Returns one message per problem.
    #[must_use]
    pub fn lint(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (position, field) in self.fields.iter().enumerate() {
            if self.fields[..position].iter().any(|earlier| earlier.name.eq_ignore_ascii_case(field.name)) {
                problems.push(format!("{}: duplicate field \"{}\"", self.name, field.name));
            }
            nested_lint(&field.kind, &mut problems);
        }
        for rule in &self.rules {
            for referenced in [rule.when_field, rule.then_field] {
                if self.get(referenced).is_none() {
                    problems.push(format!("{}: rule references unknown field \"{referenced}\"", self.name));
                }
            }
        }
        problems
    }
}

fn nested_lint(kind: &FieldKind, problems: &mut Vec<String>) {
    match kind {
        FieldKind::Object(schema) => problems.extend(schema.lint()),
        FieldKind::Array(rules) => nested_lint(&rules.items, problems),
        FieldKind::String(_) | FieldKind::Number(_) | FieldKind::Boolean | FieldKind::Date => {}
    }
}
