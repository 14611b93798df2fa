const HEADER: [&str; 4] = ["Command", "Function description", "Arguments", "Argument description"];
const WRAP_WIDTH: usize = 40;

const CREDIT_NUMBER: (&str, &str) = ("credit number", "Credit number is the unique ID number of a credit.");
const ISSUER: (&str, &str) = ("issuer", "Issuer is the unique identity of the entity which issues this credit.");
const ISSUE_DATE_TIME: (&str, &str) = ("issue date and time", "The date and time when the credit is issued.");

struct HelpEntry {
    command: &'static str,
    description: &'static str,
    arguments: &'static [(&'static str, &'static str)],
}

const ENTRIES: &[HelpEntry] = &[
    HelpEntry {
        command: "help",
        description: "List out all the functions that can be called and the arguments required.",
        arguments: &[],
    },
    HelpEntry {
        command: "instantiate",
        description: "Submits a transaction with no effect on the ledger, to verify that the contract can be reached.",
        arguments: &[],
    },
    HelpEntry {
        command: "issue",
        description: "Collects the information of a new credit and submits a transaction proposal to the blockchain network to issue it.",
        arguments: &[CREDIT_NUMBER, ISSUER, ISSUE_DATE_TIME],
    },
    HelpEntry {
        command: "query",
        description: "Collects the information of an existing credit and evaluates it against the world state to query the details of that credit.",
        arguments: &[CREDIT_NUMBER, ISSUER],
    },
];

type Row = [String; 4];

/// The command reference table printed for `help` or an empty command.
pub fn render_help() -> String {
    let header: Row = HEADER.map(str::to_string);
    let groups: Vec<Vec<Row>> = ENTRIES.iter().map(entry_rows).collect();

    let mut widths = HEADER.map(str::len);
    for row in groups.iter().flatten() {
        for (column, cell) in row.iter().enumerate() {
            for line in wrap(cell, WRAP_WIDTH) {
                widths[column] = widths[column].max(line.chars().count());
            }
        }
    }

    let separator = separator_line(&widths);
    let mut table = vec![separator.clone()];
    table.extend(render_row(&header, &widths));
    table.push(separator.clone());
    for group in &groups {
        for row in group {
            table.extend(render_row(row, &widths));
        }
        table.push(separator.clone());
    }
    table.join("\n")
}

fn entry_rows(entry: &HelpEntry) -> Vec<Row> {
    if entry.arguments.is_empty() {
        return vec![[entry.command.to_string(), entry.description.to_string(), String::new(), String::new()]];
    }
    entry
        .arguments
        .iter()
        .enumerate()
        .map(|(index, (name, description))| {
            let (command, summary) = match index {
                0 => (entry.command, entry.description),
                _ => ("", ""),
            };
            [command.to_string(), summary.to_string(), name.to_string(), description.to_string()]
        })
        .collect()
}

fn separator_line(widths: &[usize; 4]) -> String {
    let cells: Vec<String> = widths.iter().map(|width| "-".repeat(width + 2)).collect();
    format!("+{}+", cells.join("+"))
}

fn render_row(row: &Row, widths: &[usize; 4]) -> Vec<String> {
    let cells: Vec<Vec<String>> = row.iter().map(|cell| wrap(cell, WRAP_WIDTH)).collect();
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);

    (0..height)
        .map(|line| {
            let parts: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| {
                    let text = cell.get(line).map(String::as_str).unwrap_or("");
                    format!(" {:<width$} ", text, width = *width)
                })
                .collect();
            format!("|{}|", parts.join("|"))
        })
        .collect()
}

/// Greedy word wrap. A single word longer than `width` gets a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
