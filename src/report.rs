use std::fmt::Write;

use html_escape::encode_text;

use crate::block::Block;
use crate::chart::{ChartData, ChartPoint, share};
use crate::config::Config;
use crate::html::blocks_to_html;
use crate::parser::parse;
use crate::profile::FinancialProfile;
use crate::prompt::format_amount;
use crate::typst::{blocks_to_typst, escape_text, preamble};

const SAVINGS_COLOR: &str = "#10b981";
const EXPENSES_COLOR: &str = "#ef4444";
const ASSETS_COLOR: &str = "#3b82f6";
const LIABILITIES_COLOR: &str = "#f59e0b";

const CASH_FLOW_TITLE: &str = "月度收支分析";
const BALANCE_SHEET_TITLE: &str = "資產負債結構";
const SAVINGS_RATE_LABEL: &str = "儲蓄率";
const NET_WORTH_LABEL: &str = "淨資產";

/// A finished analysis: the generated text, its parsed blocks and the
/// chart figures for the profile it was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub profile: FinancialProfile,
    pub markdown: String,
    pub blocks: Vec<Block>,
    pub charts: ChartData,
    /// Seconds since the Unix epoch.
    pub generated_at: u64,
}

/// A chart ready to draw: points with their colours and relative bar lengths.
struct Bars<'a> {
    title: &'static str,
    points: Vec<(&'a ChartPoint, &'static str, f64)>,
    summary_label: &'static str,
    summary_value: String,
}

impl Report {
    pub fn new(profile: FinancialProfile, markdown: String, generated_at: u64) -> Self {
        let blocks = parse(&markdown);
        let charts = ChartData::from_profile(&profile);
        Self {
            profile,
            markdown,
            blocks,
            charts,
            generated_at,
        }
    }

    fn bars(&self) -> [Bars<'_>; 2] {
        let [savings, expenses] = &self.charts.cash_flow;
        let cash_total = savings.value + expenses.value;

        let [assets, liabilities] = &self.charts.balance_sheet;
        let balance_max = assets.value.max(liabilities.value);

        [
            Bars {
                title: CASH_FLOW_TITLE,
                points: vec![
                    (savings, SAVINGS_COLOR, share(savings.value, cash_total)),
                    (expenses, EXPENSES_COLOR, share(expenses.value, cash_total)),
                ],
                summary_label: SAVINGS_RATE_LABEL,
                summary_value: self.charts.savings_rate_label(),
            },
            Bars {
                title: BALANCE_SHEET_TITLE,
                points: vec![
                    (assets, ASSETS_COLOR, share(assets.value, balance_max)),
                    (
                        liabilities,
                        LIABILITIES_COLOR,
                        share(liabilities.value, balance_max),
                    ),
                ],
                summary_label: NET_WORTH_LABEL,
                summary_value: format!("${}", format_amount(self.charts.net_worth)),
            },
        ]
    }

    /// The whole report as a Typst document.
    pub fn to_typst(&self, config: &Config) -> String {
        let mut out = preamble(config);

        out.push_str("#align(center)[\n#text(size: 20pt, weight: \"bold\")[");
        escape_text(&config.report.title, &mut out);
        out.push_str("] \\\n#text(size: 10pt, fill: luma(100))[");
        escape_text(&config.report.subtitle, &mut out);
        out.push_str("]\n]\n\n");

        out.push_str("#text(size: 16pt, weight: \"bold\")[");
        escape_text(&config.report.heading, &mut out);
        out.push_str("]\n\n");

        out.push_str("#grid(columns: (1fr, 1fr), gutter: 1em,\n");
        for bars in self.bars() {
            bars_to_typst(&bars, &mut out);
        }
        out.push_str(")\n\n");

        out.push_str(&blocks_to_typst(&self.blocks));

        out.push_str("#line(length: 100%)\n#text(size: 8pt, fill: luma(120))[");
        escape_text(&config.report.disclaimer, &mut out);
        out.push_str("]\n");
        out
    }

    /// The whole report as a standalone HTML page.
    pub fn to_html(&self, config: &Config) -> String {
        let mut out = String::new();
        let title = encode_text(&config.report.title);

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{title}</title>");
        let _ = writeln!(out, "<style>\n{}</style>", PAGE_STYLE);
        out.push_str("</head>\n<body>\n");

        let _ = writeln!(
            out,
            "<header><h1>{title}</h1><p>{}</p></header>",
            encode_text(&config.report.subtitle)
        );
        out.push_str("<main>\n");
        let _ = writeln!(
            out,
            "<h2 class=\"report-heading\">{}</h2>",
            encode_text(&config.report.heading)
        );

        out.push_str("<section class=\"charts\">\n");
        for bars in self.bars() {
            bars_to_html(&bars, &mut out);
        }
        out.push_str("</section>\n");

        out.push_str("<article class=\"report\">\n");
        out.push_str(&blocks_to_html(&self.blocks));
        out.push_str("</article>\n");

        let _ = writeln!(
            out,
            "<footer>{}</footer>",
            encode_text(&config.report.disclaimer)
        );
        out.push_str("</main>\n</body>\n</html>\n");
        out
    }

    /// The whole report compiled to PDF.
    pub fn to_pdf(&self, config: &Config) -> Result<Vec<u8>, String> {
        crate::typst_to_pdf(self.to_typst(config), config)
    }
}

fn bars_to_typst(bars: &Bars<'_>, out: &mut String) {
    out.push_str("  [\n    #text(weight: \"bold\")[");
    escape_text(bars.title, out);
    out.push_str("]\n\n    #grid(columns: (auto, 1fr), gutter: 0.5em,\n");
    for (point, color, fraction) in &bars.points {
        out.push_str("      [");
        escape_text(point.label, out);
        let _ = write!(
            out,
            "], [#box(width: {:.1}%, height: 0.8em, fill: rgb(\"{color}\")) ",
            fraction * 100.0
        );
        escape_text(&format_amount(point.value), out);
        out.push_str("],\n");
    }
    out.push_str("    )\n\n    ");
    escape_text(bars.summary_label, out);
    out.push_str(": *");
    escape_text(&bars.summary_value, out);
    out.push_str("*\n  ],\n");
}

fn bars_to_html(bars: &Bars<'_>, out: &mut String) {
    out.push_str("<figure class=\"chart\">\n");
    let _ = writeln!(out, "<figcaption>{}</figcaption>", encode_text(bars.title));
    for (point, color, fraction) in &bars.points {
        let _ = writeln!(
            out,
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <span class=\"bar\" style=\"width: {:.1}%; background: {color}\"></span>\
             <span class=\"bar-value\">${}</span></div>",
            encode_text(point.label),
            fraction * 100.0,
            format_amount(point.value),
        );
    }
    let _ = writeln!(
        out,
        "<p class=\"chart-summary\">{}: <strong>{}</strong></p>",
        encode_text(bars.summary_label),
        encode_text(&bars.summary_value)
    );
    out.push_str("</figure>\n");
}

const PAGE_STYLE: &str = "\
body { font-family: sans-serif; background: #f8fafc; color: #0f172a; margin: 0; }
header { background: #fff; border-bottom: 1px solid #e2e8f0; padding: 1rem 2rem; }
header h1 { margin: 0; font-size: 1.25rem; }
header p { margin: 0; font-size: 0.75rem; color: #64748b; }
main { max-width: 64rem; margin: 0 auto; padding: 2rem 1rem; }
.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; margin-bottom: 2rem; }
.chart { background: #fff; border: 1px solid #f1f5f9; border-radius: 0.75rem; padding: 1rem; margin: 0; }
.bar-row { display: flex; align-items: center; gap: 0.5rem; margin: 0.5rem 0; }
.bar-label { width: 12rem; font-size: 0.875rem; }
.bar { display: inline-block; height: 0.8rem; border-radius: 0.25rem; }
.chart-summary { text-align: center; font-size: 0.875rem; color: #475569; }
.report { background: #fff; border-radius: 0.75rem; padding: 2rem 3rem; }
.report h1 { font-size: 1.875rem; }
.report h2 { font-size: 1.5rem; border-left: 4px solid #2563eb; padding-left: 0.75rem; }
.report h3 { font-size: 1.25rem; border-bottom: 1px solid #e2e8f0; padding-bottom: 0.5rem; }
.report .ordered-line { margin: 0 0 0.5rem 1rem; font-weight: 500; color: #334155; }
footer { margin-top: 3rem; font-size: 0.75rem; color: #94a3b8; text-align: center; }
";
