use bayan::keywords::KEYWORDS;
use bayan::{Clause, Keyword, PredicateSummary, QueryResult, Response, Solution, Vocabulary};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use std::rc::Rc;

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_response(&self, response: &Response) -> String {
        let mut output = String::new();

        for warning in &response.warnings {
            output.push_str(&format!("warning: {}\n", warning));
        }
        if !response.warnings.is_empty() {
            output.push('\n');
        }

        for result in &response.results {
            output.push_str(&self.format_query_result(result));
            output.push('\n');
        }

        if !response.directives.is_empty() {
            for directive in &response.directives {
                let mark = if directive.succeeded { "✓" } else { "×" };
                output.push_str(&format!("{} {}\n", mark, directive.directive));
            }
            output.push('\n');
        }

        output
    }

    fn format_query_result(&self, result: &QueryResult) -> String {
        let mut title = result.query.clone();
        if let Some(line) = result.line {
            title = format!("{}  (line {})", title, line);
        }

        let mut output = format!("{}\n", title);
        output.push_str(&self.format_solutions(&result.variables, &result.solutions));
        if let Some(error) = &result.error {
            output.push_str(&format!("stopped: {}\n", error));
        }
        output
    }

    /// One row per solution, one column per named query variable
    ///
    /// A query without variables prints `true` or `false` instead of a table.
    pub fn format_solutions(&self, variables: &[String], solutions: &[Solution]) -> String {
        if solutions.is_empty() {
            return "false\n".to_string();
        }
        if variables.is_empty() {
            return "true\n".to_string();
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(
            variables
                .iter()
                .map(|name| Cell::new(format!("?{}", name)).set_alignment(CellAlignment::Left))
                .collect::<Vec<_>>(),
        ));

        for solution in solutions {
            table.add_row(Row::from(
                variables
                    .iter()
                    .map(|name| {
                        solution
                            .get(name)
                            .map(|term| term.to_string())
                            .unwrap_or_else(|| "_".to_string())
                    })
                    .collect::<Vec<_>>(),
            ));
        }

        format!(
            "{}\n{} solution(s)\n",
            table,
            solutions.len()
        )
    }

    pub fn format_workspace_summary(
        &self,
        file_count: usize,
        summary: &[PredicateSummary],
    ) -> String {
        let mut output = format!(
            "Workspace contains {} files, {} predicates\n\n",
            file_count,
            summary.len()
        );
        if summary.is_empty() {
            return output;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Predicate", "Arity", "Facts", "Rules"]);
        for predicate in summary {
            table.add_row(vec![
                Cell::new(&predicate.name),
                Cell::new(predicate.arity).set_alignment(CellAlignment::Right),
                Cell::new(predicate.facts).set_alignment(CellAlignment::Right),
                Cell::new(predicate.rules).set_alignment(CellAlignment::Right),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    pub fn format_clauses(&self, name: &str, clauses: &[Rc<Clause>], vocabulary: Vocabulary) -> String {
        let mut output = format!("{} ({} clauses):\n", name, clauses.len());
        for clause in clauses {
            output.push_str(&format!("  {}\n", clause.render(vocabulary)));
        }
        output
    }

    /// Every keyword kind with its Latin and Arabic spellings, preferred first
    pub fn format_keywords(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Keyword", "Latin", "Arabic"]);

        for keyword in Keyword::ALL {
            let spellings = |vocabulary: Vocabulary| {
                KEYWORDS
                    .iter()
                    .filter(|entry| entry.keyword == keyword && entry.vocabulary == vocabulary)
                    .map(|entry| entry.spelling)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            table.add_row(vec![
                keyword.canonical_name().to_string(),
                spellings(Vocabulary::Latin),
                spellings(Vocabulary::Arabic),
            ]);
        }

        format!("{}\n", table)
    }
}
