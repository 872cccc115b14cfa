use crate::spec::HybridEditorSpec;
use crate::token::{Token, TokenValue};

/// Index of the token paired with the one at `index`, like the `)` closing
/// a `(`. Nested pairs are skipped.
pub(crate) fn pair_of<N: TokenValue>(
    spec: &dyn HybridEditorSpec<N>,
    tokens: &[Token<N>],
    index: usize,
) -> Option<usize> {
    let token = tokens.get(index)?;
    if spec.is_pair_left(token) {
        let mut depth = 0usize;
        for (i, candidate) in tokens.iter().enumerate().skip(index + 1) {
            if spec.is_pair_left(candidate) {
                depth += 1;
            } else if spec.is_pair_right(candidate) {
                if depth == 0 {
                    return spec.is_pair(token, candidate).then_some(i);
                }
                depth -= 1;
            }
        }
    } else if spec.is_pair_right(token) {
        let mut depth = 0usize;
        for (i, candidate) in tokens[..index].iter().enumerate().rev() {
            if spec.is_pair_right(candidate) {
                depth += 1;
            } else if spec.is_pair_left(candidate) {
                if depth == 0 {
                    return spec.is_pair(candidate, token).then_some(i);
                }
                depth -= 1;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{Sum, SumSpec, id, lp, plus, rp};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(vec![lp(), rp()], 0, Some(1))]
    #[case(vec![lp(), rp()], 1, Some(0))]
    #[case(vec![lp(), lp(), rp(), rp()], 3, Some(0))]
    #[case(vec![lp(), lp(), rp(), rp()], 1, Some(2))]
    #[case(vec![lp(), id("a"), plus(), rp()], 0, Some(3))]
    #[case(vec![lp()], 0, None)]
    #[case(vec![rp(), lp()], 0, None)]
    #[case(vec![id("a")], 0, None)]
    #[case(vec![lp()], 4, None)]
    fn finds_pairs(#[case] tokens: Vec<Token<Sum>>, #[case] index: usize, #[case] expected: Option<usize>) {
        assert_eq!(pair_of(&SumSpec::default(), &tokens, index), expected);
    }
}
