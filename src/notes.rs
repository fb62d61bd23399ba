/// Trims every line and drops blank ones so pasted notes hash and prompt consistently.
pub fn normalize_notes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(trimmed);
        }
    }

    result
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

const PROMPT_HEADER: &str = "You are a study assistant. Read the student's notes below and respond with ONLY a JSON object, no prose, of the form:\n\
{\"summary\": [\"<bullet point>\", ...], \"quiz\": [{\"question\": \"<question>\", \"options\": [\"<option>\", ...], \"answer\": \"<option>\"}]}\n\
Write 3 to 7 concise summary bullet points. Write up to 5 multiple choice questions with 4 options each. \
Every answer must be copied exactly from its options.\n\nNotes:\n";

pub fn build_prompt(notes: &str) -> String {
    let mut result = String::with_capacity(notes.len() + PROMPT_HEADER.len());
    result.push_str(PROMPT_HEADER);
    result.push_str(notes);
    result
}
