//! Yes/no confirmation prompts
//!
//! Only the word `yes` (any case, surrounding whitespace ignored) counts as a
//! confirmation. Everything else, including `y`, is a no.

use std::io::{self, BufRead, Write};

/// Returns true when an answer confirms a prompt
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Asks a yes/no question on `output` and reads one answer line from `input`
///
/// Used when standard input is not a terminal, so answers can be piped in.
/// An exhausted input counts as a no.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use tvhelper::confirm_line;
///
/// let mut input = Cursor::new("yes\n");
/// let mut output = Vec::new();
/// assert!(confirm_line(&mut input, &mut output, "Rename?").unwrap());
/// ```
pub fn confirm_line<R, W>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{} (yes/no): ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(is_yes(&line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("yes"));
        assert!(is_yes("  YES \n"));
        assert!(is_yes("Yes"));
        assert!(!is_yes("y"));
        assert!(!is_yes("no"));
        assert!(!is_yes(""));
        assert!(!is_yes("yes please"));
    }

    #[test]
    fn test_confirm_line_reads_one_line_per_prompt() {
        let mut input = Cursor::new("yes\nno\nYES\n");
        let mut output = Vec::new();

        assert!(confirm_line(&mut input, &mut output, "First?").unwrap());
        assert!(!confirm_line(&mut input, &mut output, "Second?").unwrap());
        assert!(confirm_line(&mut input, &mut output, "Third?").unwrap());

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "First? (yes/no): Second? (yes/no): Third? (yes/no): "
        );
    }

    #[test]
    fn test_confirm_line_rejects_short_answer() {
        let mut input = Cursor::new("y\n");
        let mut output = Vec::new();

        assert!(!confirm_line(&mut input, &mut output, "Rename?").unwrap());
    }

    #[test]
    fn test_confirm_line_at_end_of_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        assert!(!confirm_line(&mut input, &mut output, "Rename?").unwrap());
    }

    #[test]
    fn test_piped_answers_rename_existing_folder() {
        use crate::folder_reconciler::reconcile_show_folder;
        use crate::temp::create_temp_dir;
        use std::collections::BTreeSet;
        use std::fs;

        let base = create_temp_dir("prompt_test").unwrap();
        fs::create_dir(base.join("Foo Bar")).unwrap();

        let mut input = Cursor::new("yes\nyes\n");
        let mut output = Vec::new();
        let path = reconcile_show_folder(
            &base,
            "Foo Bar",
            999,
            &BTreeSet::new(),
            |prompt: &str| confirm_line(&mut input, &mut output, prompt),
            |_| {},
        )
        .unwrap();

        assert_eq!(path, base.join("Foo Bar {tvdb-999}"));
        assert!(path.is_dir());
        assert!(!base.join("Foo Bar").exists());
        assert!(
            String::from_utf8(output)
                .unwrap()
                .starts_with("Folder 'Foo Bar' exists. Is this the correct folder? (yes/no): ")
        );
    }
}
