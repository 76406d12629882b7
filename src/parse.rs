use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::types::{Mailbox, Message, DEFAULT_SUBJECT};

lazy_static! {
    static ref EXISTS_LINE: Regex = Regex::new(r"\* (\d+) EXISTS").unwrap();
    static ref FETCH_LINE: Regex = Regex::new(r"^\* \d+ FETCH").unwrap();
    static ref COMPLETION_LINE: Regex = Regex::new(r"^A\d+ (OK|NO|BAD)\b").unwrap();
}

/// Where the scanner is within one FETCH response.
///
/// `* <n> FETCH` marker lines move `SeekingMessage -> InHeaders` (finalizing
/// any message already under construction); the `BODY[TEXT]` section marker
/// moves `InHeaders -> InBody`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    SeekingMessage,
    InHeaders,
    InBody,
}

/// Extracts the mailbox message count from the untagged lines of a SELECT
/// response. A response without an EXISTS line yields a count of 0.
pub fn parse_mailbox(response: &str) -> Mailbox {
    let exists = EXISTS_LINE
        .captures(response)
        .and_then(|cap| cap[1].parse().ok())
        .unwrap_or(0);
    Mailbox { exists }
}

/// Scans the accumulated text of one FETCH transaction into message records,
/// in the order the server emitted them.
///
/// The scan is deliberately best-effort: a block with missing or mangled
/// headers degrades to defaulted fields, and never aborts the rest of the
/// batch. Length-prefixed literal framing (`{<n>}`) is not interpreted; the
/// header and body sections are treated as plain lines.
pub fn parse_fetch_response(response: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut current: Option<Message> = None;
    let mut body = String::new();
    let mut state = ParseState::SeekingMessage;

    for line in response.lines() {
        if FETCH_LINE.is_match(line) {
            if let Some(message) = current.take() {
                messages.push(finalize(message, &body));
            }
            current = Some(Message::new());
            body.clear();
            state = ParseState::InHeaders;
        } else if line.contains("BODY[TEXT]") {
            if state == ParseState::InHeaders {
                state = ParseState::InBody;
            }
        } else {
            match state {
                ParseState::SeekingMessage => {}
                ParseState::InHeaders => {
                    if let Some(ref mut message) = current {
                        header_field(message, line);
                    }
                }
                ParseState::InBody => {
                    if !line.trim().is_empty() && !COMPLETION_LINE.is_match(line) {
                        body.push_str(line);
                        body.push('\n');
                    }
                }
            }
        }
    }

    if let Some(message) = current.take() {
        messages.push(finalize(message, &body));
    }

    messages
}

fn finalize(mut message: Message, body: &str) -> Message {
    message.text = body.trim().to_string();
    if message.subject.is_empty() {
        message.subject = DEFAULT_SUBJECT.to_string();
    }
    message
}

fn header_field(message: &mut Message, line: &str) {
    if let Some(value) = header_value(line, "from:") {
        message.from = value;
    } else if let Some(value) = header_value(line, "to:") {
        message.to = value;
    } else if let Some(value) = header_value(line, "subject:") {
        message.subject = value;
    } else if let Some(value) = header_value(line, "date:") {
        message.date = parse_date(&value);
    }
}

fn header_value(line: &str, prefix: &str) -> Option<String> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(line[prefix.len()..].trim().to_string())
    } else {
        None
    }
}

fn parse_date(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc2822(value)
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_exists() {
        let response = "* FLAGS (\\Seen \\Deleted)\r\n\
                        * 120 EXISTS\r\n\
                        * 0 RECENT\r\n\
                        A002 OK [READ-WRITE] Select completed.\r\n";
        assert_eq!(parse_mailbox(response), Mailbox { exists: 120 });
    }

    #[test]
    fn mailbox_without_exists_line() {
        let response = "A002 OK Select completed.\r\n";
        assert_eq!(parse_mailbox(response), Mailbox { exists: 0 });
    }

    #[test]
    fn two_blocks_in_server_order() {
        let response = "* 1 FETCH (BODY[HEADER.FIELDS (FROM TO SUBJECT DATE)] {92}\r\n\
                        From: Alice <a@x.com>\r\n\
                        To: Bob <b@y.com>\r\n\
                        Subject: Hi\r\n\
                        Date: Tue, 1 Jul 2003 10:52:37 +0200\r\n\
                        BODY[TEXT] {7}\r\n\
                        Hello\r\n\
                        * 2 FETCH (BODY[HEADER.FIELDS (FROM TO SUBJECT DATE)] {2}\r\n\
                        BODY[TEXT] {9}\r\n\
                        Goodbye\r\n\
                        A003 OK Fetch completed.\r\n";
        let before = Utc::now();
        let messages = parse_fetch_response(response);
        let after = Utc::now();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].from, "Alice <a@x.com>");
        assert_eq!(messages[0].to, "Bob <b@y.com>");
        assert_eq!(messages[0].subject, "Hi");
        assert_eq!(
            messages[0].date,
            DateTime::parse_from_rfc2822("Tue, 1 Jul 2003 10:52:37 +0200")
                .unwrap()
                .with_timezone(&Utc)
        );
        assert_eq!(messages[0].text, "Hello");

        // the second block carried no headers at all
        assert_eq!(messages[1].from, "");
        assert_eq!(messages[1].to, "");
        assert_eq!(messages[1].subject, DEFAULT_SUBJECT);
        assert!(messages[1].date >= before && messages[1].date <= after);
        assert_eq!(messages[1].text, "Goodbye");
    }

    #[test]
    fn header_prefixes_are_case_insensitive() {
        let response = "* 3 FETCH (stuff\r\n\
                        FROM: carol@z.org\r\n\
                        SUBJECT: shouting\r\n\
                        BODY[TEXT]\r\n\
                        hi\r\n";
        let messages = parse_fetch_response(response);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, "carol@z.org");
        assert_eq!(messages[0].subject, "shouting");
    }

    #[test]
    fn unparseable_date_defaults_to_now() {
        let response = "* 1 FETCH (stuff\r\n\
                        From: a@x.com\r\n\
                        Date: not a date at all\r\n\
                        BODY[TEXT]\r\n\
                        body\r\n\
                        * 2 FETCH (stuff\r\n\
                        From: b@y.com\r\n\
                        Date: Tue, 1 Jul 2003 10:52:37 +0200\r\n\
                        BODY[TEXT]\r\n\
                        body two\r\n";
        let before = Utc::now();
        let messages = parse_fetch_response(response);
        let after = Utc::now();

        // the bad date degrades to "now" without dropping either message
        assert_eq!(messages.len(), 2);
        assert!(messages[0].date >= before && messages[0].date <= after);
        assert_eq!(messages[1].from, "b@y.com");
    }

    #[test]
    fn empty_subject_gets_placeholder() {
        let response = "* 1 FETCH (stuff\r\n\
                        From: a@x.com\r\n\
                        Subject:\r\n\
                        BODY[TEXT]\r\n\
                        body\r\n";
        let messages = parse_fetch_response(response);
        assert_eq!(messages[0].subject, DEFAULT_SUBJECT);
    }

    #[test]
    fn completion_line_is_not_body_text() {
        let response = "* 1 FETCH (stuff\r\n\
                        Subject: x\r\n\
                        BODY[TEXT]\r\n\
                        line one\r\n\
                        \r\n\
                        line two\r\n\
                        A003 OK Fetch completed.\r\n";
        let messages = parse_fetch_response(response);
        assert_eq!(messages[0].text, "line one\nline two");
    }

    #[test]
    fn no_fetch_marker_yields_no_messages() {
        assert!(parse_fetch_response("A003 OK Fetch completed.\r\n").is_empty());
        assert!(parse_fetch_response("").is_empty());
    }
}
