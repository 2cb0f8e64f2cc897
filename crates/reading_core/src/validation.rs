use shared::{
    domain::{DecisionOptions, ReadingMode, SeedInput},
    error::ReadingError,
    modes,
    protocol::ReadingRequest,
};

pub const MIN_SEED_NUMBER: i64 = 1;
pub const MAX_SEED_NUMBER: i64 = 100_000;

/// A submission that passed every form rule and can be drawn.
#[derive(Debug, Clone)]
pub struct ValidatedReading {
    pub mode: &'static ReadingMode,
    pub question: String,
    pub options: Option<DecisionOptions>,
    pub seed: SeedInput,
}

pub fn validate(request: &ReadingRequest) -> Result<ValidatedReading, ReadingError> {
    let mode = modes::find(&request.mode_id)
        .ok_or_else(|| ReadingError::UnknownMode(request.mode_id.clone()))?;

    if request.question.trim().is_empty() {
        return Err(ReadingError::validation("question", mode.question_prompt));
    }

    if request.numbers.len() != mode.card_count {
        return Err(ReadingError::validation(
            "numbers",
            format!(
                "{} (expected {}, got {})",
                mode.numbers_prompt,
                mode.card_count,
                request.numbers.len()
            ),
        ));
    }

    let numbers = request
        .numbers
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_seed_number(i + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let options = if mode.requires_options {
        Some(DecisionOptions {
            first: required_option("option1", request.option_a.as_deref())?,
            second: required_option("option2", request.option_b.as_deref())?,
        })
    } else {
        None
    };

    Ok(ValidatedReading {
        mode,
        question: request.question.clone(),
        options,
        seed: SeedInput::new(request.timestamp, request.question.clone(), numbers),
    })
}

fn parse_seed_number(position: usize, raw: &str) -> Result<i64, ReadingError> {
    let field = format!("number{position}");
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ReadingError::validation(field, "a number is required"));
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| ReadingError::validation(field.clone(), format!("'{raw}' is not a whole number")))?;
    if !(MIN_SEED_NUMBER..=MAX_SEED_NUMBER).contains(&value) {
        return Err(ReadingError::validation(
            field,
            format!("must be between {MIN_SEED_NUMBER} and {MAX_SEED_NUMBER}"),
        ));
    }
    Ok(value)
}

fn required_option(field: &str, value: Option<&str>) -> Result<String, ReadingError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ReadingError::validation(field, "describe this option")),
    }
}

#[cfg(test)]
mod tests {
    use shared::error::ErrorCode;

    use super::*;

    fn field_of(err: ReadingError) -> String {
        match err {
            ReadingError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_three_card_request() {
        let request = ReadingRequest::three_card("Will it rain?", [" 10", "20 ", "30"], 2024);
        let valid = validate(&request).expect("valid");
        assert_eq!(valid.mode.id, modes::THREE_CARD);
        assert_eq!(valid.seed.numbers, vec![10, 20, 30]);
        assert!(valid.options.is_none());
    }

    #[test]
    fn rejects_blank_question() {
        let request = ReadingRequest::three_card("   ", [1, 2, 3], 2024);
        assert_eq!(field_of(validate(&request).expect_err("blank")), "question");
    }

    #[test]
    fn errors_repeat_the_mode_input_prompts() {
        let mode = modes::find(modes::RELATIONSHIP).expect("mode");

        let blank = ReadingRequest::new(modes::RELATIONSHIP, "", [1, 2, 3, 4, 5], 2024);
        let err = validate(&blank).expect_err("blank");
        assert_eq!(err.to_string(), format!("question: {}", mode.question_prompt));

        let short = ReadingRequest::new(modes::RELATIONSHIP, "Are we okay?", [1, 2, 3], 2024);
        let err = validate(&short).expect_err("count");
        assert_eq!(
            err.to_string(),
            format!("numbers: {} (expected 5, got 3)", mode.numbers_prompt)
        );
    }

    #[test]
    fn rejects_out_of_range_and_malformed_numbers() {
        let zero = ReadingRequest::three_card("q", ["1", "0", "3"], 2024);
        assert_eq!(field_of(validate(&zero).expect_err("zero")), "number2");

        let too_big = ReadingRequest::three_card("q", ["1", "2", "100001"], 2024);
        assert_eq!(field_of(validate(&too_big).expect_err("big")), "number3");

        let decimal = ReadingRequest::three_card("q", ["1.5", "2", "3"], 2024);
        assert_eq!(field_of(validate(&decimal).expect_err("decimal")), "number1");

        let missing = ReadingRequest::three_card("q", ["1", "", "3"], 2024);
        assert_eq!(field_of(validate(&missing).expect_err("missing")), "number2");
    }

    #[test]
    fn rejects_wrong_number_count() {
        let request = ReadingRequest::new(modes::RELATIONSHIP, "q", [1, 2, 3], 2024);
        assert_eq!(field_of(validate(&request).expect_err("count")), "numbers");
    }

    #[test]
    fn decision_requires_both_options() {
        let request = ReadingRequest::new(modes::DECISION, "Which offer?", [4, 5], 2024)
            .with_options("Take the Berlin job", "  ");
        assert_eq!(field_of(validate(&request).expect_err("option")), "option2");

        let complete = ReadingRequest::new(modes::DECISION, "Which offer?", [4, 5], 2024)
            .with_options("Take the Berlin job", "Stay in Lisbon");
        let options = validate(&complete).expect("valid").options.expect("options");
        assert_eq!(options.first, "Take the Berlin job");
        assert_eq!(options.second, "Stay in Lisbon");
    }

    #[test]
    fn decision_options_keep_their_original_text() {
        let request = ReadingRequest::new(modes::DECISION, "Which offer?", [4, 5], 2024)
            .with_options("  Move north\n", "Stay");
        let options = validate(&request).expect("valid").options.expect("options");
        assert_eq!(options.first, "  Move north\n");
        assert_eq!(options.second, "Stay");
    }

    #[test]
    fn unknown_mode_is_reported() {
        let request = ReadingRequest::new("celtic-cross", "q", [1], 2024);
        let err = validate(&request).expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::UnknownMode);
    }
}
