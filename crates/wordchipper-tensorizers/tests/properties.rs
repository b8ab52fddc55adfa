#![allow(missing_docs)]

use proptest::prelude::*;
use wordchipper_tensorizers::{
    data::Row,
    initialization::{Initialize, initialize_tensorizers},
    padding::pad_and_stack,
    tensorizers::{Tensorizer, TokenTensorizer, TokenTensorizerOptions},
    tokenizers::{SplitTokenizer, Tokenizer},
};

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..12).prop_map(|words| words.join(" "))
}

fn build(
    options: TokenTensorizerOptions,
    corpus: &[String],
) -> TokenTensorizer {
    let mut tensorizer = options.init().unwrap();
    let rows: Vec<Row> = corpus
        .iter()
        .map(|text| Row::new().with("text", text.as_str()))
        .collect();
    let targets: Vec<&mut dyn Initialize> = vec![&mut tensorizer];
    initialize_tensorizers(targets, &rows).unwrap();
    tensorizer
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn token_row_length(
        corpus in prop::collection::vec(sentence(), 1..4),
        text in sentence(),
        max_seq_len in prop::option::of(0usize..8),
        add_bos in any::<bool>(),
        add_eos in any::<bool>()
    ) {
        let options = TokenTensorizerOptions::default()
            .with_bos_token(add_bos)
            .with_eos_token(add_eos)
            .with_max_seq_len(max_seq_len);
        let tensorizer = build(options, &corpus);

        let count = SplitTokenizer::default().tokenize(&text).len();
        let expected = max_seq_len.map_or(count, |m| count.min(m))
            + usize::from(add_bos)
            + usize::from(add_eos);

        let row = tensorizer.numberize(&Row::new().with("text", text.as_str())).unwrap();
        prop_assert_eq!(row.len, expected);
        prop_assert_eq!(row.ids.len(), expected);
        prop_assert_eq!(tensorizer.sort_key(&row), Some(expected));
    }

    #[test]
    fn vocab_round_trip(corpus in prop::collection::vec(sentence(), 1..6)) {
        let tensorizer = build(TokenTensorizerOptions::default(), &corpus);

        for text in &corpus {
            let row = tensorizer.numberize(&Row::new().with("text", text.as_str())).unwrap();
            let symbols = tensorizer.reverse_lookup(&row.ids).unwrap();
            let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            prop_assert_eq!(symbols, tokens);
        }
    }

    #[test]
    fn pad_and_stack_shape(rows in prop::collection::vec(prop::collection::vec(1i64..100, 0..10), 0..8)) {
        let out = pad_and_stack(&rows, 0);
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        prop_assert_eq!(out.dim(), (rows.len(), width));

        for (i, row) in rows.iter().enumerate() {
            for j in 0..width {
                let expected = row.get(j).copied().unwrap_or(0);
                prop_assert_eq!(out[[i, j]], expected);
            }
        }
    }
}
