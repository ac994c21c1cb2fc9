// Settings shared by the parser and the code generator for one translation
#[derive (Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    // Number of spaces per indentation level in the generated code
    pub indent_width: usize,

    // Wrap the program in def main() with a header and the __main__ guard
    pub emit_entry_point: bool,

    // Keep statement-level comments in the AST and translate them
    pub preserve_comments: bool
}

impl Default for CompilerOptions {
    fn default() -> Self {
        return CompilerOptions {
            indent_width: 4,
            emit_entry_point: true,
            preserve_comments: false
        };
    }
}

impl CompilerOptions {
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        return self;
    }

    pub fn with_entry_point(mut self, emit_entry_point: bool) -> Self {
        self.emit_entry_point = emit_entry_point;
        return self;
    }

    pub fn with_comments(mut self, preserve_comments: bool) -> Self {
        self.preserve_comments = preserve_comments;
        return self;
    }
}
