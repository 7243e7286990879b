//! Prompts for AI prescription extraction.
//!
//! The answer format mirrors [`crate::extraction::AiOutput`]. Prompts use
//! plain chat tags so any instruction-tuned backend can consume them.

use medscript_core::models::{NormalizedInput, SourceModality};

/// System prompt for prescription extraction.
pub const SYSTEM_PROMPT: &str = r#"You are a medical prescription assistant that extracts medications from prescriptions, including poorly printed, handwritten or dictated ones.

Prescription vocabulary:
- Forms: Tab = tablet, Cap = capsule, Syr/Syp = syrup, Inj = injection, Gtt = drops, Inh = inhaler
- Frequency: OD = once daily, BD/BID = twice daily, TDS/TID = three times daily, QDS/QID = four times daily, HS = at bedtime
- Instructions: PRN = as needed, AC = before meals, PC = after meals
- Duration: "x 5d" = 5 days, "x 2 weeks" = 14 days
- Units: mg, ml, mcg, IU

For each medication extract:
- medicine_name: drug name as written (brand or generic)
- form: tablet, capsule, syrup, injection, drop, inhaler or other
- dosage: amount per dose with units (e.g., "1 tablet (650)", "5ml")
- frequency: doses per day as an integer
- times: HH:MM dose times, only if the prescription states them
- course_duration_days: course length in days as an integer
- administration_instruction: e.g., "As needed", "Before meals"
- color: color word for the medicine if mentioned (e.g., "white", "light blue")
- source_line: the exact input line the medication was read from

Use null for anything the prescription does not state. Do not invent times or dates.

Output JSON with a "medications" array, a "raw_text" string holding the text you read, and a "processing_notes" string for uncertainties."#;

/// Lead-in describing where the text came from.
pub fn input_label(input: &NormalizedInput) -> &'static str {
    let mut sources = input.non_empty_lines().map(|(_, line)| line.source);
    let Some(first) = sources.next() else {
        return "Prescription text";
    };
    if sources.any(|s| s != first) {
        return "Prescription text (merged from typed text, OCR and speech)";
    }
    match first {
        SourceModality::Text => "Prescription text",
        SourceModality::Ocr => "OCR transcript of a prescription image (expect misread characters)",
        SourceModality::Speech => "Voice transcription of a prescription (numbers may be spelled out)",
    }
}

/// User prompt for one prescription.
pub fn make_extraction_prompt(text: &str, label: &str) -> String {
    format!(
        r#"{}:

"{}"

Return a JSON object with a "medications" array. Each medication should have:
- medicine_name: The drug name
- form: Dose form (null if not specified)
- dosage: Amount per dose (null if not specified)
- frequency: Doses per day (null if not specified)
- times: HH:MM times (null if not specified)
- course_duration_days: Days (null if not specified)
- administration_instruction: Instruction (null if not specified)
- color: Color word (null if not specified)
- source_line: The input line the medication came from"#,
        label, text
    )
}

/// Example exchanges for better extraction accuracy.
pub const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "Tab Dolo 650 1 OD x 5d",
        r#"{"medications":[{"medicine_name":"Dolo","form":"tablet","dosage":"1 tablet (650)","frequency":1,"times":null,"course_duration_days":5,"administration_instruction":null,"color":null,"source_line":"Tab Dolo 650 1 OD x 5d"}],"raw_text":"Tab Dolo 650 1 OD x 5d","processing_notes":""}"#,
    ),
    (
        "Amoxicillin 500mg - 1 capsule - twice daily - 7 days",
        r#"{"medications":[{"medicine_name":"Amoxicillin","form":"capsule","dosage":"1 capsule (500mg)","frequency":2,"times":null,"course_duration_days":7,"administration_instruction":null,"color":null,"source_line":"Amoxicillin 500mg - 1 capsule - twice daily - 7 days"}],"raw_text":"Amoxicillin 500mg - 1 capsule - twice daily - 7 days","processing_notes":""}"#,
    ),
    (
        "Syr Benadryl red 10ml TDS after food x 3d",
        r#"{"medications":[{"medicine_name":"Benadryl","form":"syrup","dosage":"10ml","frequency":3,"times":null,"course_duration_days":3,"administration_instruction":"After meals","color":"red","source_line":"Syr Benadryl red 10ml TDS after food x 3d"}],"raw_text":"Syr Benadryl red 10ml TDS after food x 3d","processing_notes":""}"#,
    ),
];

/// Build a complete prompt with system context and few-shot examples.
pub fn build_full_prompt(text: &str, label: &str, include_examples: bool) -> String {
    let mut prompt = String::new();

    prompt.push_str("<|system|>\n");
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n<|end|>\n");

    if include_examples {
        for (input, output) in FEW_SHOT_EXAMPLES {
            prompt.push_str("<|user|>\n");
            prompt.push_str(&make_extraction_prompt(input, "Prescription text"));
            prompt.push_str("\n<|end|>\n");
            prompt.push_str("<|assistant|>\n");
            prompt.push_str(output);
            prompt.push_str("\n<|end|>\n");
        }
    }

    prompt.push_str("<|user|>\n");
    prompt.push_str(&make_extraction_prompt(text, label));
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}
