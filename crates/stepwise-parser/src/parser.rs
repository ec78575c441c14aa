//! Feature parser: a three-state machine over classified lines.

use stepwise_lexer::{Line, LineKind};
use stepwise_types::{DataTable, Keyword, Scenario, Step};

/// Parser mode: what the previous lines opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Plain lines: headers, steps, prose.
    Neutral,
    /// Between `"""` fences. Every line is content until the closing fence.
    DocString,
    /// After at least one `|` row. Any non-row line closes the table.
    DataTable,
}

/// The stepwise feature parser.
///
/// Consumes the line stream produced by the lexer and builds scenarios.
/// Parsing is lenient: lines that fit nowhere are dropped, never reported.
pub struct Parser {
    /// The line stream.
    lines: Vec<Line>,
    /// Completed scenarios, in source order.
    scenarios: Vec<Scenario>,
    /// The scenario currently receiving steps.
    current: Option<Scenario>,
    mode: Mode,
    /// Doc-string lines collected so far.
    doc_lines: Vec<String>,
}

impl Parser {
    /// Create a new parser from a line stream.
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            scenarios: Vec::new(),
            current: None,
            mode: Mode::Neutral,
            doc_lines: Vec::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the line stream into scenarios.
    pub fn parse(mut self) -> Vec<Scenario> {
        let lines = std::mem::take(&mut self.lines);
        for line in lines {
            self.parse_line(line);
        }
        if let Some(scenario) = self.current.take() {
            self.scenarios.push(scenario);
        }
        tracing::debug!(scenarios = self.scenarios.len(), "parsed feature");
        self.scenarios
    }

    // ── Line dispatch ─────────────────────────────────────────────────────────

    fn parse_line(&mut self, line: Line) {
        if self.mode == Mode::DocString {
            match line.kind {
                LineKind::DocStringFence => self.close_doc_string(),
                _ => self.doc_lines.push(line.raw),
            }
            return;
        }

        if self.mode == Mode::DataTable && !line.kind.is_table_row() {
            self.mode = Mode::Neutral;
        }

        match line.kind {
            LineKind::ScenarioHeader(name) => self.start_scenario(name, line.line),
            LineKind::Step(keyword, text) => self.push_step(keyword, text, line.line),
            LineKind::DocStringFence => self.open_doc_string(),
            LineKind::TableRow(cells) => self.push_table_row(cells),
            LineKind::Other => {}
        }
    }

    // ── Scenarios & steps ─────────────────────────────────────────────────────

    fn start_scenario(&mut self, name: String, line: u32) {
        if let Some(done) = self.current.take() {
            self.scenarios.push(done);
        }
        self.current = Some(Scenario::new(name, line));
        self.mode = Mode::Neutral;
    }

    fn push_step(&mut self, keyword: Keyword, text: String, line: u32) {
        let Some(scenario) = self.current.as_mut() else {
            return;
        };
        let kind = keyword.resolve(scenario.last_kind());
        scenario.steps.push(Step::new(kind, keyword, text, line));
        self.mode = Mode::Neutral;
    }

    /// The most recently parsed step of the open scenario.
    fn current_step(&mut self) -> Option<&mut Step> {
        self.current.as_mut()?.steps.last_mut()
    }

    // ── Doc-strings ───────────────────────────────────────────────────────────

    fn open_doc_string(&mut self) {
        let Some(step) = self.current_step() else {
            return;
        };
        step.doc_string = Some(String::new());
        self.doc_lines.clear();
        self.mode = Mode::DocString;
    }

    fn close_doc_string(&mut self) {
        let text = std::mem::take(&mut self.doc_lines).join("\n");
        if let Some(step) = self.current_step() {
            step.doc_string = Some(text);
        }
        self.mode = Mode::Neutral;
    }

    // ── Data tables ───────────────────────────────────────────────────────────

    fn push_table_row(&mut self, cells: Vec<String>) {
        let starting = self.mode != Mode::DataTable;
        let Some(step) = self.current_step() else {
            return;
        };
        if starting {
            step.data_table = Some(DataTable::default());
        }
        step.data_table
            .get_or_insert_with(DataTable::default)
            .push_row(cells);
        self.mode = Mode::DataTable;
    }
}
