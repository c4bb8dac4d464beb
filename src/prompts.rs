//! Instruction texts sent to the oracle alongside each document.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the field names and date-format strings
//!    below are a contract: [`crate::pipeline::parse`] assumes exactly this
//!    key set and [`crate::dates`] assumes exactly these formats. Changing
//!    a field name means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    spinning up a real oracle, making contract regressions easy to catch.

/// Instruction block sent with a solicitor-letter document or image.
///
/// Demands a JSON-only reply with the exact four-key set the response
/// parser expects, and empty string for anything the oracle cannot find.
pub const SOLICITOR_LETTER: &str = r#"Extract the following 4 pieces of information from this solicitor's letter. This is a UK legal document for a military noise-induced hearing loss (MNIHL) claim.

CRITICAL: You must respond with ONLY valid JSON. Do not include any markdown, backticks, or explanatory text. The response must be parseable JSON only.

Extract these fields:
1. solicitor_ref - The case reference number (often contains slashes, dots, initials like "806964.001/CGN/CD")
2. name - The claimant's FULL name including all middle names (e.g., "John William Landels Porter")
3. address - The claimant's full address including postcode (UK format, may have no space in postcode like "RG198XQ")
4. dob - Date of birth in DD/MM/YYYY format (e.g., "10/03/1978")

Return format (THIS MUST BE THE ENTIRE RESPONSE - NOTHING ELSE):
{
  "solicitor_ref": "extracted reference",
  "name": "extracted full name",
  "address": "extracted full address",
  "dob": "DD/MM/YYYY"
}

If you cannot find a field, use empty string "". DO NOT ADD ANY TEXT OUTSIDE THE JSON OBJECT."#;

/// Instruction block sent with an audiogram document or image.
pub const AUDIOGRAM: &str = r#"Extract the audiogram test date from this audiogram. This is a hearing test chart.

CRITICAL: You must respond with ONLY valid JSON. Do not include any markdown, backticks, or explanatory text.

Look for the date the hearing test was conducted. It may be labeled as:
- "Test Date"
- "Date"
- "Date of Test"
- Or similar

Return the date in DD/MM/YY format (2-digit year, e.g., "24/08/25").

Return format (THIS MUST BE THE ENTIRE RESPONSE):
{
  "audiogram_date": "DD/MM/YY"
}

If you cannot find the date, use empty string "". DO NOT ADD ANY TEXT OUTSIDE THE JSON OBJECT."#;

/// Build the solicitor-letter prompt for a plain-text upload.
///
/// Non-PDF, non-image letters have no document block to attach, so the
/// (lossily decoded) body is embedded in the instruction text itself.
pub fn solicitor_letter_text(document: &str) -> String {
    format!("{SOLICITOR_LETTER}\n\nDocument content:\n{document}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solicitor_prompt_names_all_four_fields() {
        for key in ["solicitor_ref", "name", "address", "dob"] {
            assert!(
                SOLICITOR_LETTER.contains(&format!("\"{key}\"")),
                "prompt must name field {key}"
            );
        }
        assert!(SOLICITOR_LETTER.contains("DD/MM/YYYY"));
    }

    #[test]
    fn audiogram_prompt_demands_two_digit_year() {
        assert!(AUDIOGRAM.contains("\"audiogram_date\""));
        assert!(AUDIOGRAM.contains("DD/MM/YY"));
        // Must not ask for a four-digit year anywhere
        assert!(!AUDIOGRAM.contains("DD/MM/YYYY"));
    }

    #[test]
    fn both_prompts_mandate_empty_string_sentinel() {
        assert!(SOLICITOR_LETTER.contains(r#"empty string """#));
        assert!(AUDIOGRAM.contains(r#"empty string """#));
    }

    #[test]
    fn text_prompt_embeds_document() {
        let prompt = solicitor_letter_text("Dear Sirs,\nOur ref: 123/AB");
        assert!(prompt.contains("Document content:\nDear Sirs,"));
        assert!(prompt.starts_with(SOLICITOR_LETTER));
    }
}
