//! Oracle prompt engineering for confirmation-note field extraction

/// Builds the extraction prompt handed to the oracle.
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a builder over the (already truncated) recognized text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the complete extraction prompt.
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Document text:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract the following fields from this confirmation note document:

- is_cn: is this document a confirmation note? (true/false)
- operation_type: type of transaction operation (e.g., Purchase, Redemption, Switch, Subscription)
- is_multiseries: is this a multiseries transaction? (true/false)
- currency: transaction currency code (e.g., USD, EUR, GBP, CHF)
- gross_amount: gross transaction amount (numeric value)
- net_amount: net transaction amount (numeric value)
- units: number of units or shares (numeric value)
- equalization: equalization amount (numeric value)
- fees: total fees charged (numeric value)
- nav_price: net asset value price per unit (numeric value)
- nav_date: NAV date (format: YYYY-MM-DD or DD/MM/YYYY)
- settlement_date: settlement date (format: YYYY-MM-DD or DD/MM/YYYY)

If a field is not stated in the document, use null."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Respond with ONLY a single valid JSON object with the keys:
is_cn, operation_type, is_multiseries, currency, gross_amount, net_amount,
units, equalization, fees, nav_price, nav_date, settlement_date

No markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;
    use confnote_domain::CnFields;

    #[test]
    fn test_prompt_includes_document_text() {
        let prompt = PromptBuilder::new("GROSS AMOUNT 10,500.00 USD").build();
        assert!(prompt.contains("GROSS AMOUNT 10,500.00 USD"));
        assert!(prompt.contains("Document text:"));
    }

    #[test]
    fn test_prompt_fences_the_document() {
        let prompt = PromptBuilder::new("body").build();
        assert!(prompt.contains("---\nbody\n---"));
    }

    #[test]
    fn test_prompt_names_every_output_field() {
        let prompt = PromptBuilder::new("body").build();
        for name in CnFields::NAMES {
            assert!(prompt.contains(name), "prompt is missing field: {}", name);
        }
    }

    #[test]
    fn test_prompt_demands_json_only() {
        let prompt = PromptBuilder::new("body").build();
        assert!(prompt.contains("ONLY a single valid JSON object"));
        assert!(prompt.contains("use null"));
    }
}
