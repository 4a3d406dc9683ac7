mod block;
mod chart;
mod classify;
mod config;
mod gemini;
mod html;
mod inline;
mod lines;
mod parser;
mod profile;
mod prompt;
mod report;
mod session;
mod typst;

pub use block::{Block, List, ListItem, Span};
pub use chart::{ChartData, ChartPoint};
pub use classify::{LineKind, classify};
pub use config::{ApiConfig, Config, FontConfig, PageConfig, ReportConfig};
pub use gemini::{GENERATION_FAILED_MESSAGE, GeminiClient, ReportError, ReportGenerator};
pub use inline::format_inline;
pub use lines::{Line, Lines, segment};
pub use profile::{FinancialProfile, ProfileError, RiskTolerance};
pub use prompt::{SYSTEM_INSTRUCTION, build_prompt, format_amount};
pub use report::Report;
pub use session::{AppState, Session, SessionError};

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse report markdown into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    let mut out = typst::preamble(config);
    out.push_str(&typst::blocks_to_typst(&blocks));
    out
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    html::blocks_to_html(&parse(markdown))
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, String> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>, String> {
    typst_to_pdf(markdown_to_typst_with_config(markdown, config), config)
}

/// Compile Typst markup to PDF bytes.
pub(crate) fn typst_to_pdf(typst_content: String, config: &Config) -> Result<Vec<u8>, String> {
    use typst_library::layout::PagedDocument;

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(config.font.system_fonts);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| format!("Typst compilation failed: {:?}", e))?;

    typst_pdf::pdf(&doc, &PdfOptions::default())
        .map_err(|e| format!("PDF generation failed: {:?}", e))
}
