//! Splits user-entered command text into words.

/// Split an input line into whitespace-separated words.
///
/// A `"` at the start of a word opens a quoted region: everything up to the
/// closing `"` becomes a single word with whitespace preserved, quotes
/// excluded. An unterminated quote yields whatever was buffered. There is no
/// escaping; a `"` inside a bare word is an ordinary character.
pub fn split_words(input: &str) -> Vec<String> {
    enum State {
        Between,
        InWord,
        Quoted,
    }

    let mut words = Vec::new();
    let mut word = String::new();
    let mut state = State::Between;

    for c in input.chars() {
        match state {
            State::Between => {
                if c.is_whitespace() {
                    continue;
                }
                if c == '"' {
                    state = State::Quoted;
                } else {
                    word.push(c);
                    state = State::InWord;
                }
            }
            State::InWord => {
                if c.is_whitespace() {
                    words.push(std::mem::take(&mut word));
                    state = State::Between;
                } else {
                    word.push(c);
                }
            }
            State::Quoted => {
                if c == '"' {
                    words.push(std::mem::take(&mut word));
                    state = State::Between;
                } else {
                    word.push(c);
                }
            }
        }
    }

    if !word.is_empty() {
        words.push(word);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(split_words("").is_empty());
    }

    #[test]
    fn single_word() {
        assert_eq!(split_words("word"), ["word"]);
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(split_words("   word \t"), ["word"]);
    }

    #[test]
    fn multiple_words() {
        assert_eq!(split_words("this is a test"), ["this", "is", "a", "test"]);
    }

    #[test]
    fn mixed_whitespace() {
        assert_eq!(
            split_words(" this    is \t\n a   test  "),
            ["this", "is", "a", "test"]
        );
    }

    #[test]
    fn quoted_region_is_one_word() {
        assert_eq!(
            split_words(r#"what "is this thing""#),
            ["what", "is this thing"]
        );
    }

    #[test]
    fn quotes_anywhere_in_the_line() {
        assert_eq!(
            split_words(r#""is this thing" this "thing""#),
            ["is this thing", "this", "thing"]
        );
    }

    #[test]
    fn unterminated_quote_keeps_partial_word() {
        assert_eq!(split_words(r#"say "hello wor"#), ["say", "hello wor"]);
    }

    #[test]
    fn empty_quotes_yield_empty_word() {
        assert_eq!(split_words(r#"a "" b"#), ["a", "", "b"]);
    }

    #[test]
    fn quote_inside_word_is_literal() {
        assert_eq!(split_words(r#"don"t panic"#), ["don\"t", "panic"]);
    }
}
