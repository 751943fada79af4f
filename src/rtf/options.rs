/// Configuration of tree maintenance and markup emission.
///
/// # Examples
///
/// ```rust
/// use rtfflow::rtf::XamlOptions;
///
/// let options = XamlOptions::new()
///     .with_invariant_checks(true)
///     .with_language(false);
/// assert!(options.check_invariants);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XamlOptions {
    /// Verify tree invariants after every structural edit
    pub check_invariants: bool,
    /// Emit `xml:lang` when the language changes
    pub emit_language: bool,
    /// Emit the `<Table.Columns>` block after a table's start tag
    pub emit_table_columns: bool,
    /// Longest font family name emitted, in characters
    pub max_font_name_len: usize,
}

impl Default for XamlOptions {
    fn default() -> Self {
        Self {
            check_invariants: cfg!(debug_assertions),
            emit_language: true,
            emit_table_columns: true,
            max_font_name_len: 32,
        }
    }
}

impl XamlOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether tree invariants are verified after structural edits.
    ///
    /// Violations indicate bugs and trip a debug assertion.
    #[inline]
    pub fn with_invariant_checks(mut self, check: bool) -> Self {
        self.check_invariants = check;
        self
    }

    #[inline]
    pub fn with_language(mut self, emit: bool) -> Self {
        self.emit_language = emit;
        self
    }

    #[inline]
    pub fn with_table_columns(mut self, emit: bool) -> Self {
        self.emit_table_columns = emit;
        self
    }

    /// Set the truncation length for font family names.
    #[inline]
    pub fn with_max_font_name_len(mut self, len: usize) -> Self {
        self.max_font_name_len = len;
        self
    }
}
