use std::time::{SystemTime, UNIX_EPOCH};

use crate::console::{ask_yes_no, prompt_until_confirmed, read_input, Console};
use crate::types::ClientError;

const CONFIRM_INPUTS: &str = "-> Are these inputs correct? [y/n]: ";

/// Fields of a credit to issue, not yet confirmed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub credit_number: String,
    pub issuer: String,
    pub issue_date_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDraft {
    pub credit_number: String,
    pub issuer: String,
}

impl IssueDraft {
    pub fn args(&self) -> [&str; 3] {
        [self.credit_number.as_str(), self.issuer.as_str(), self.issue_date_time.as_str()]
    }
}

impl QueryDraft {
    pub fn args(&self) -> [&str; 2] {
        [self.credit_number.as_str(), self.issuer.as_str()]
    }
}

/// Collects all three fields, each typed in or generated, until the operator accepts the set.
pub fn collect_issue_draft<C: Console>(console: &mut C, user_label: &str) -> Result<IssueDraft, ClientError> {
    prompt_until_confirmed(
        console,
        |console| {
            Ok(IssueDraft {
                credit_number: credit_number(console)?,
                issuer: issuer(console, user_label)?,
                issue_date_time: issue_date_time(console)?,
            })
        },
        |_| CONFIRM_INPUTS.to_string(),
        Some("-> Please enter the details of the credit to issue again."),
    )
}

pub fn collect_query_draft<C: Console>(console: &mut C) -> Result<QueryDraft, ClientError> {
    prompt_until_confirmed(
        console,
        |console| {
            let credit_number = entered(console, "-> Please enter the credit number: ", "credit number")?;
            let issuer = entered(console, "-> Please enter the issuer: ", "issuer")?;
            Ok(QueryDraft { credit_number, issuer })
        },
        |_| CONFIRM_INPUTS.to_string(),
        Some("-> Please enter the details of the credit to query again."),
    )
}

fn credit_number<C: Console>(console: &mut C) -> Result<String, ClientError> {
    if ask_yes_no(console, "-> Do you want to assign a specific credit number? [y/n]: ")? {
        entered(console, "-> Please enter the credit number: ", "credit number")
    } else {
        console.write_line("-> Generating credit number.");
        let credit_number = generate_credit_number();
        console.write_line(&format!("-> The credit number automatically generated is: {}", credit_number));
        Ok(credit_number)
    }
}

fn issuer<C: Console>(console: &mut C, user_label: &str) -> Result<String, ClientError> {
    if ask_yes_no(console, "-> Do you want to use your username as issuer? [y/n]: ")? {
        console.write_line("-> Using your username as the issuer");
        console.write_line(&format!("-> The issuer is: {}", user_label));
        Ok(user_label.to_string())
    } else {
        entered(console, "-> Please enter the issuer: ", "issuer")
    }
}

fn issue_date_time<C: Console>(console: &mut C) -> Result<String, ClientError> {
    if ask_yes_no(console, "-> Do you want to generate the issue date and time of the credit automatically? [y/n]: ")? {
        console.write_line("-> Getting date and time.");
        let issue_date_time = generate_issue_date_time();
        console.write_line(&format!("-> The date and time is: {}", issue_date_time));
        Ok(issue_date_time)
    } else {
        entered(console, "-> Please enter the issue date and time: ", "issue date and time")
    }
}

fn entered<C: Console>(console: &mut C, prompt: &str, field: &str) -> Result<String, ClientError> {
    let value = read_input(console, prompt)?;
    console.write_line(&format!("-> The {} you entered is: {}", field, value));
    Ok(value)
}

// TODO: follow the network's credit naming rule once one is agreed on.
pub fn generate_credit_number() -> String {
    format!("Credit-{}", epoch_millis())
}

pub fn generate_issue_date_time() -> String {
    epoch_millis().to_string()
}

fn epoch_millis() -> u128 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u128::from(now.as_secs()) * 1000 + u128::from(now.subsec_nanos()) / 1_000_000
}
