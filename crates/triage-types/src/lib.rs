/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a [`SymptomLabel`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LabelError {
    /// The label was empty or contained only whitespace
    #[error("symptom label cannot be empty")]
    Empty,
    /// The label contains the storage delimiter
    #[error("symptom label must not contain ',': {0:?}")]
    ContainsDelimiter(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A reported symptom label.
///
/// The text is kept exactly as reported so it can be shown back to a clinician. Lookups
/// against reference data go through [`normalize_label`].
///
/// Labels are stored comma-joined, so a label may not contain [`SymptomLabel::DELIMITER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymptomLabel(String);

impl SymptomLabel {
    /// Separator used when a label sequence is persisted as a single text column.
    pub const DELIMITER: char = ',';

    /// Validates a label without altering it.
    ///
    /// # Errors
    ///
    /// - [`LabelError::Empty`] if the label is blank.
    /// - [`LabelError::ContainsDelimiter`] if it contains [`SymptomLabel::DELIMITER`].
    pub fn new(input: impl Into<String>) -> Result<Self, LabelError> {
        let raw = input.into();
        if raw.trim().is_empty() {
            return Err(LabelError::Empty);
        }
        if raw.contains(Self::DELIMITER) {
            return Err(LabelError::ContainsDelimiter(raw));
        }
        Ok(Self(raw))
    }

    /// The label as reported.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymptomLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymptomLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SymptomLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SymptomLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SymptomLabel::new(s).map_err(serde::de::Error::custom)
    }
}

/// Lower-cases and trims a symptom name for case-insensitive lookup.
pub fn normalize_label(input: &str) -> String {
    input.trim().to_lowercase()
}
