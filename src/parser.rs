use combine::stream::state::State;
use combine::*;

use crate::error::CalcError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    Number(f64),
    // Variables
    Var(String),
    // Arithmetic
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

fn skip_whitespace<I>() -> impl Parser<Input = I, Output = ()>
where
    I: Stream<Item = char, Error = easy::ParseError<I>>,
{
    parser::char::spaces().silent()
}

// Digits with at most one decimal point; "1.2.3" and a lone "." are rejected
// by the float conversion.
fn number<I>() -> impl Parser<Input = I, Output = f64>
where
    I: Stream<Item = char, Error = easy::ParseError<I>>,
{
    many1::<String, _>(parser::char::digit().or(parser::char::char('.')))
        .and_then(|s| s.parse::<f64>())
}

fn lex_char<I>(c: char) -> impl Parser<Input = I, Output = char>
where
    I: Stream<Item = char, Error = easy::ParseError<I>>,
{
    parser::char::char(c).skip(skip_whitespace())
}

// The first character may be any letter. The rest may be alphanumeric.
fn ident<I>() -> impl Parser<Input = I, Output = String>
where
    I: Stream<Item = char, Error = easy::ParseError<I>>,
{
    look_ahead(parser::char::letter())
        .then(|_| many1(parser::char::alpha_num().or(parser::char::char('_'))))
}

fn binary(op: char) -> fn(Expr, Expr) -> Expr {
    match op {
        '+' => |a, b| Expr::Add(Box::new(a), Box::new(b)),
        '-' => |a, b| Expr::Sub(Box::new(a), Box::new(b)),
        '*' => |a, b| Expr::Mul(Box::new(a), Box::new(b)),
        _ => |a, b| Expr::Div(Box::new(a), Box::new(b)),
    }
}

parser! {
    fn atom[I]()(I) -> Expr
        where [
            I: Stream<Item = char, Error = easy::ParseError<I>>,
        ]
    {
        let ch = choice!(
            attempt(number()).map(Expr::Number),
            attempt(ident().map(Expr::Var)),
            between(lex_char('('), lex_char(')'), expression()),
            (lex_char('-'), atom()).map(|x| Expr::Neg(Box::new(x.1)))
        );
        (skip_whitespace(), ch, skip_whitespace()).map(|x| x.1)
    }
}

// Each precedence level is a left fold over the level below it, so operator
// chains build the tree without recursing per operator.
fn product<I>() -> impl Parser<Input = I, Output = Expr>
where
    I: Stream<Item = char, Error = easy::ParseError<I>>,
{
    chainl1(atom(), choice!(lex_char('*'), lex_char('/')).map(binary))
}

pub fn expression<I>() -> impl Parser<Input = I, Output = Expr>
where
    I: Stream<Item = char, Error = easy::ParseError<I>>,
{
    chainl1(product(), choice!(lex_char('+'), lex_char('-')).map(binary))
}

// Trailing input (a stray ")", an unknown symbol) and empty lines are errors.
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    (expression(), eof())
        .easy_parse(State::new(input))
        .map(|((expr, _), _)| expr)
        .map_err(|err| CalcError::Parse(one_line(&err.to_string())))
}

// combine reports one fact per line; the calculator shows a single line.
fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse("42"), Ok(Expr::Number(42.0)));
        assert_eq!(parse("3.25"), Ok(Expr::Number(3.25)));
        assert_eq!(parse(".5"), Ok(Expr::Number(0.5)));
        assert_eq!(parse("  7  "), Ok(Expr::Number(7.0)));
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(
            parse("1+2*3"),
            Ok(Expr::Add(num(1.0), Box::new(Expr::Mul(num(2.0), num(3.0)))))
        );
        assert_eq!(
            parse("1*2+3"),
            Ok(Expr::Add(Box::new(Expr::Mul(num(1.0), num(2.0))), num(3.0)))
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse("8-4-2"),
            Ok(Expr::Sub(Box::new(Expr::Sub(num(8.0), num(4.0))), num(2.0)))
        );
        assert_eq!(
            parse("8/4/2"),
            Ok(Expr::Div(Box::new(Expr::Div(num(8.0), num(4.0))), num(2.0)))
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse("(1 + 2) * 3"),
            Ok(Expr::Mul(Box::new(Expr::Add(num(1.0), num(2.0))), num(3.0)))
        );
    }

    #[test]
    fn test_unary_minus_binds_to_operand() {
        assert_eq!(
            parse("-2+3"),
            Ok(Expr::Add(Box::new(Expr::Neg(num(2.0))), num(3.0)))
        );
        assert_eq!(
            parse("2*-3"),
            Ok(Expr::Mul(num(2.0), Box::new(Expr::Neg(num(3.0)))))
        );
        assert_eq!(
            parse("--1"),
            Ok(Expr::Neg(Box::new(Expr::Neg(num(1.0)))))
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            parse("2*pi"),
            Ok(Expr::Mul(num(2.0), Box::new(Expr::Var("pi".into()))))
        );
    }

    #[test]
    fn test_long_chain_is_left_deep() {
        let input = vec!["1"; 5000].join("+");
        let mut expr = parse(&input).unwrap();
        let mut depth = 0;
        while let Expr::Add(lhs, rhs) = expr {
            assert_eq!(*rhs, Expr::Number(1.0));
            expr = *lhs;
            depth += 1;
        }
        assert_eq!(expr, Expr::Number(1.0));
        assert_eq!(depth, 4999);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for input in &["", "   ", "1+", "2*", "(1+2", "1+2)", "()", "1.2.3", ".", "1 $ 2", "2(3)"] {
            match parse(input) {
                Err(CalcError::Parse(message)) => {
                    assert!(!message.is_empty(), "empty message for {:?}", input);
                    assert!(!message.contains('\n'));
                }
                other => panic!("expected parse error for {:?}, got {:?}", input, other),
            }
        }
    }
}
