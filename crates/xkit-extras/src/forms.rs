#![forbid(unsafe_code)]

//! Multi-stage form state.
//!
//! A form is declared as an ordered list of stages, each an ordered set of
//! named fields. [`FormState`] keeps one raw string per field across every
//! stage, so moving between stages never loses input, and tracks the current
//! stage, the latest validation errors and whether the form was submitted.
//!
//! Stage navigation does not validate on its own. The usual flow is
//! "validate the current stage, advance only if clean", which
//! [`FormState::advance`] bundles.
//!
//! # Example
//!
//! ```rust
//! use xkit_extras::forms::{FieldSpec, Form, FormState, StageSpec};
//!
//! let form = Form::from_stages(vec![
//!     StageSpec::new().field("a", FieldSpec::text()),
//!     StageSpec::new().field("b", FieldSpec::text().required()),
//! ])
//! .unwrap();
//! let mut state = FormState::new(form);
//!
//! state.next();
//! assert_eq!(state.stage(), 1);
//! assert!(!state.validate_stage(1).unwrap().is_empty());
//!
//! state.update_field("b", "filled").unwrap();
//! assert!(state.submit());
//! assert!(state.is_finish());
//! ```
//!
//! Feature-gated under `forms`.

use std::collections::HashMap;
use std::fmt;

use xkit_core::debug;
use xkit_text::Template;

use crate::validation::{PrimitiveKind, Validator, Value};

// ---------------------------------------------------------------------------
// Field and stage declarations
// ---------------------------------------------------------------------------

/// How a field is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// Plain text.
    #[default]
    Text,
    /// Masked text.
    Password,
    /// Phone number (country + local number).
    Phone,
}

/// Declaration of one field.
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    kind: FieldKind,
    label: Option<String>,
    placeholder: Option<String>,
    default: String,
    validator: Option<Validator>,
    template: Template,
    required: bool,
}

impl FieldSpec {
    /// A field of the given kind with no constraints.
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// A text field.
    #[must_use]
    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    /// A password field.
    #[must_use]
    pub fn password() -> Self {
        Self::new(FieldKind::Password)
    }

    /// A phone field.
    #[must_use]
    pub fn phone() -> Self {
        Self::new(FieldKind::Phone)
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the value used at construction and on reset.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }

    /// Attach a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach a display mask; stored values are clamped to its capacity.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<Template>) -> Self {
        self.template = template.into();
        self
    }

    /// Flag an empty value as an error, independent of any validator.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Presentation kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Display label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Placeholder, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Declared default (before clamping).
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Attached validator, if any.
    #[must_use]
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Display mask.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Whether the field is flagged required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check a raw value against this field's constraints.
    ///
    /// The `required` flag is checked first. An empty value for a
    /// non-string validator that is not itself required counts as "not
    /// provided" and passes.
    #[must_use]
    pub fn check(&self, name: &str, raw: &str) -> Option<String> {
        if self.required && raw.is_empty() {
            return Some(format!("\"{name}\" is required"));
        }
        let validator = self.validator.as_ref()?;
        let kind = validator.expected_kind();
        if raw.is_empty() && kind != PrimitiveKind::String {
            if !validator.is_required() {
                return None;
            }
            return validator.safe_validate(None);
        }
        validator.safe_validate(Some(Value::coerce(raw, kind)))
    }
}

/// An ordered set of named fields shown together.
#[derive(Debug, Clone, Default)]
pub struct StageSpec {
    fields: Vec<(String, FieldSpec)>,
}

impl StageSpec {
    /// An empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the stage declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldSpec)> for StageSpec {
    fn from_iter<I: IntoIterator<Item = (S, FieldSpec)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Misuse of a form definition or state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A form needs at least one stage.
    NoStages,
    /// A field name was declared twice (field values share one namespace).
    DuplicateField {
        /// The repeated name.
        name: String,
    },
    /// No field with this name exists.
    UnknownField {
        /// The requested name.
        name: String,
    },
    /// Stage index past the last stage.
    StageOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of stages.
        count: usize,
    },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStages => write!(f, "form has no stages"),
            Self::DuplicateField { name } => write!(f, "field \"{name}\" is declared twice"),
            Self::UnknownField { name } => write!(f, "unknown field \"{name}\""),
            Self::StageOutOfRange { index, count } => {
                write!(f, "stage {index} out of range (form has {count})")
            }
        }
    }
}

impl std::error::Error for FormError {}

// ---------------------------------------------------------------------------
// Form (normalized definition)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct FieldSlot {
    name: String,
    stage: usize,
    spec: FieldSpec,
}

/// A validated, normalized form definition.
///
/// Positional and named stage lists both end up here as one ordered stage
/// list with a parallel list of stage names.
#[derive(Debug, Clone)]
pub struct Form {
    stage_names: Vec<String>,
    /// Flat field list in stage order, then declaration order.
    slots: Vec<FieldSlot>,
    /// `stage_ranges[i]` indexes `slots` for stage `i`.
    stage_ranges: Vec<std::ops::Range<usize>>,
    index: HashMap<String, usize>,
}

impl Form {
    /// Build from positional stages; stage names are `"0"`, `"1"`, ...
    ///
    /// # Errors
    /// [`FormError::NoStages`] or [`FormError::DuplicateField`].
    pub fn from_stages(stages: Vec<StageSpec>) -> Result<Self, FormError> {
        Self::from_named_stages(
            stages
                .into_iter()
                .enumerate()
                .map(|(i, stage)| (i.to_string(), stage)),
        )
    }

    /// Build from `(name, stage)` pairs, keeping their order.
    ///
    /// # Errors
    /// [`FormError::NoStages`] or [`FormError::DuplicateField`].
    pub fn from_named_stages<N, I>(stages: I) -> Result<Self, FormError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, StageSpec)>,
    {
        let mut form = Self {
            stage_names: Vec::new(),
            slots: Vec::new(),
            stage_ranges: Vec::new(),
            index: HashMap::new(),
        };
        for (stage_idx, (stage_name, stage)) in stages.into_iter().enumerate() {
            let start = form.slots.len();
            for (name, spec) in stage.fields {
                if form.index.contains_key(&name) {
                    return Err(FormError::DuplicateField { name });
                }
                form.index.insert(name.clone(), form.slots.len());
                form.slots.push(FieldSlot {
                    name,
                    stage: stage_idx,
                    spec,
                });
            }
            form.stage_names.push(stage_name.into());
            form.stage_ranges.push(start..form.slots.len());
        }
        if form.stage_names.is_empty() {
            return Err(FormError::NoStages);
        }
        Ok(form)
    }

    /// Number of stages (at least one).
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stage_names.len()
    }

    /// Name of stage `idx`.
    #[must_use]
    pub fn stage_name(&self, idx: usize) -> Option<&str> {
        self.stage_names.get(idx).map(String::as_str)
    }

    /// Index of the stage called `name`.
    #[must_use]
    pub fn stage_index(&self, name: &str) -> Option<usize> {
        self.stage_names.iter().position(|n| n == name)
    }

    /// Fields of stage `idx` in declaration order.
    pub fn stage_fields(&self, idx: usize) -> impl Iterator<Item = (&str, &FieldSpec)> {
        let range = self.stage_ranges.get(idx).cloned().unwrap_or(0..0);
        self.slots[range]
            .iter()
            .map(|slot| (slot.name.as_str(), &slot.spec))
    }

    /// Declaration of field `name`.
    #[must_use]
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.slots[i].spec)
    }

    /// Stage that declares field `name`.
    #[must_use]
    pub fn field_stage(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&i| self.slots[i].stage)
    }

    fn check_stage(&self, idx: usize) -> Result<std::ops::Range<usize>, FormError> {
        self.stage_ranges
            .get(idx)
            .cloned()
            .ok_or(FormError::StageOutOfRange {
                index: idx,
                count: self.stage_count(),
            })
    }

    fn defaults(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| slot.spec.template.clamp(&slot.spec.default).to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Message from the first failed constraint.
    pub message: String,
}

/// Errors of one validation pass, in declaration order. Empty means clean.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// No field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Failed fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

/// Mutable state of a multi-stage form.
///
/// Invariants:
/// - `stage() < stage_count()`
/// - every declared field has a value
/// - `is_finish()` iff on the last stage and submitted
#[derive(Debug, Clone)]
pub struct FormState {
    form: Form,
    stage: usize,
    values: Vec<String>,
    defaults: Vec<String>,
    errors: FieldErrors,
    submitted: bool,
}

impl FormState {
    /// Start at stage 0 with declared defaults.
    #[must_use]
    pub fn new(form: Form) -> Self {
        let defaults = form.defaults();
        Self {
            values: defaults.clone(),
            defaults,
            form,
            stage: 0,
            errors: FieldErrors::default(),
            submitted: false,
        }
    }

    /// The form definition.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    // --- Values ---

    /// Set a field's raw value, clamped to its template.
    ///
    /// # Errors
    /// [`FormError::UnknownField`].
    pub fn update_field(&mut self, name: &str, value: impl AsRef<str>) -> Result<(), FormError> {
        let idx = self.slot(name)?;
        let spec = &self.form.slots[idx].spec;
        self.values[idx] = spec.template.clamp(value.as_ref()).to_string();
        Ok(())
    }

    /// Current raw value of `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.index.get(name).map(|&i| self.values[i].as_str())
    }

    /// Current display value of `name` (raw value through the field's mask).
    #[must_use]
    pub fn display_value(&self, name: &str) -> Option<String> {
        let &i = self.form.index.get(name)?;
        Some(self.form.slots[i].spec.template.format(&self.values[i]))
    }

    /// All `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.form
            .slots
            .iter()
            .zip(&self.values)
            .map(|(slot, value)| (slot.name.as_str(), value.as_str()))
    }

    /// True when `name` differs from its default.
    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.form
            .index
            .get(name)
            .is_some_and(|&i| self.values[i] != self.defaults[i])
    }

    /// Names of fields that differ from their defaults.
    #[must_use]
    pub fn dirty_fields(&self) -> Vec<&str> {
        self.form
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.values[*i] != self.defaults[*i])
            .map(|(_, slot)| slot.name.as_str())
            .collect()
    }

    // --- Navigation ---

    /// Current stage index.
    #[must_use]
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.form.stage_count()
    }

    /// Name of the current stage.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        self.form.stage_name(self.stage).unwrap_or_default()
    }

    /// A later stage exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.stage + 1 < self.stage_count()
    }

    /// An earlier stage exists.
    #[must_use]
    pub fn has_back(&self) -> bool {
        self.stage > 0
    }

    /// Move forward one stage; no-op on the last stage. Does not validate.
    pub fn next(&mut self) {
        if self.has_next() {
            self.stage += 1;
            debug!(stage = self.stage, "form advanced");
        }
    }

    /// Move back one stage; no-op on the first. Keeps `submitted`.
    pub fn back(&mut self) {
        if self.has_back() {
            self.stage -= 1;
            debug!(stage = self.stage, "form went back");
        }
    }

    /// Validate the current stage and move forward only if it is clean.
    ///
    /// Returns `true` when the stage validated cleanly.
    pub fn advance(&mut self) -> bool {
        let clean = self.validate_current_stage().is_empty();
        if clean {
            self.next();
        }
        clean
    }

    // --- Validation ---

    /// Validate every field of stage `idx` and store the result as the
    /// latest errors.
    ///
    /// # Errors
    /// [`FormError::StageOutOfRange`].
    pub fn validate_stage(&mut self, idx: usize) -> Result<FieldErrors, FormError> {
        let range = self.form.check_stage(idx)?;
        let errors: Vec<FieldError> = range
            .filter_map(|i| {
                let slot = &self.form.slots[i];
                slot.spec
                    .check(&slot.name, &self.values[i])
                    .map(|message| FieldError {
                        field: slot.name.clone(),
                        message,
                    })
            })
            .collect();
        debug!(stage = idx, failed = errors.len(), "stage validated");
        self.errors = FieldErrors { errors };
        Ok(self.errors.clone())
    }

    /// [`validate_stage`](Self::validate_stage) for the current stage.
    pub fn validate_current_stage(&mut self) -> FieldErrors {
        self.validate_stage(self.stage).unwrap_or_default()
    }

    /// Latest validation errors (empty when the last pass was clean).
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Latest error for `name`.
    #[must_use]
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    // --- Lifecycle ---

    /// Reset the fields of stage `idx` to the empty string.
    ///
    /// # Errors
    /// [`FormError::StageOutOfRange`].
    pub fn clear_stage(&mut self, idx: usize) -> Result<(), FormError> {
        let range = self.form.check_stage(idx)?;
        for value in &mut self.values[range] {
            value.clear();
        }
        Ok(())
    }

    /// [`clear_stage`](Self::clear_stage) for the current stage.
    pub fn clear_current_stage(&mut self) {
        let range = self.form.stage_ranges[self.stage].clone();
        for value in &mut self.values[range] {
            value.clear();
        }
    }

    /// Validate the last stage; mark submitted when clean.
    ///
    /// Returns whether the form is now submitted.
    pub fn submit(&mut self) -> bool {
        let last = self.stage_count() - 1;
        let clean = self.validate_stage(last).is_ok_and(|errors| errors.is_empty());
        if clean {
            self.submitted = true;
        }
        debug!(submitted = self.submitted, "form submit");
        clean
    }

    /// Whether [`submit`](Self::submit) succeeded since the last reset.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// On the last stage and submitted.
    #[must_use]
    pub fn is_finish(&self) -> bool {
        self.submitted && self.stage + 1 == self.stage_count()
    }

    /// Back to stage 0, not submitted, declared defaults, no errors.
    pub fn reset(&mut self) {
        self.stage = 0;
        self.submitted = false;
        self.values.clone_from(&self.defaults);
        self.errors = FieldErrors::default();
        debug!("form reset");
    }

    fn slot(&self, name: &str) -> Result<usize, FormError> {
        self.form
            .index
            .get(name)
            .copied()
            .ok_or_else(|| FormError::UnknownField {
                name: name.to_string(),
            })
    }
}
