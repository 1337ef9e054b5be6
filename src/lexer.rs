use crate::error::Error;
use crate::token::{Op, Token};
use crate::util::FUNCTIONS;
use std::iter::Peekable;
use std::str::Chars;

#[must_use]
/// Check if `ident` is a valid symbol name
///
/// # Examples
///
/// ```
/// # use calq::is_variable;
///
/// assert_eq!(is_variable("m_e"), true);
/// assert_eq!(is_variable("34zb"), false);
/// ```
pub fn is_variable(ident: &str) -> bool {
    let mut chars = ident.chars();
    // Check first char
    if !chars.next().map_or(false, is_variable_start) {
        return false;
    }
    // Check all others
    chars.all(is_variable_part)
}

/// An helper struct for lexing the input
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(string: &'a str) -> Lexer<'a> {
        Lexer {
            input: string.chars().peekable(),
        }
    }

    /// Lex the whole input and convert it to reverse polish notation with
    /// the shunting-yard algorithm.
    pub fn parse(&mut self) -> Result<Vec<Token>, Error> {
        let tokens = self.tokens()?;
        let mut output = Vec::new();
        let mut operators: Vec<Token> = Vec::new();

        'tokens: for token in tokens {
            match token {
                Token::Value(ref name) if FUNCTIONS.contains_key(name.as_str()) => {
                    operators.push(token.clone());
                }
                Token::Value(_) => output.push(token),
                // prefix operators never pop anything
                Token::Op(Op::Neg) => operators.push(token),
                Token::Op(o1) => {
                    'operators: while let Some(top) = operators.last().cloned() {
                        match top {
                            Token::Op(o2) => {
                                let pop_me =
                                    o1.is_left_associative() && o1.precedence() <= o2.precedence();
                                let pop_me = pop_me
                                    || o1.is_right_associative()
                                        && o1.precedence() < o2.precedence();
                                if pop_me {
                                    operators.pop();
                                    output.push(top);
                                } else {
                                    break 'operators;
                                }
                            }
                            _ => break 'operators,
                        }
                    }
                    operators.push(token);
                }
                Token::LParen => operators.push(token),
                Token::RParen => {
                    while let Some(top) = operators.pop() {
                        match top {
                            Token::LParen => {
                                let next_is_fn = matches!(
                                    operators.last(),
                                    Some(Token::Value(name)) if FUNCTIONS.contains_key(name.as_str())
                                );
                                if next_is_fn {
                                    if let Some(func) = operators.pop() {
                                        output.push(func);
                                    }
                                }
                                continue 'tokens;
                            }
                            Token::Op(_) => output.push(top),
                            other => {
                                return Err(Error::parse(format!(
                                    "unexpected {:?} in operator stack",
                                    other
                                )))
                            }
                        }
                    }
                    return Err(Error::parse("mismatched parenthesis"));
                }
            }
        }

        while let Some(token) = operators.pop() {
            match token {
                Token::LParen => return Err(Error::parse("mismatched parenthesis")),
                Token::Op(_) => output.push(token),
                other => {
                    return Err(Error::parse(format!(
                        "unexpected {:?} in operator stack",
                        other
                    )))
                }
            }
        }
        Ok(output)
    }

    /// Lex the input into infix tokens, resolving unary signs and making
    /// implicit multiplications explicit.
    pub fn tokens(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens: Vec<Token> = Vec::new();
        while let Some(token) = self.next_token()? {
            let previous = tokens.last();
            let after_function = matches!(
                previous,
                Some(Token::Value(name)) if FUNCTIONS.contains_key(name.as_str())
            );
            if after_function && token != Token::LParen {
                if let Some(Token::Value(name)) = previous {
                    return Err(Error::parse(format!(
                        "function '{}' requires parentheses",
                        name
                    )));
                }
            }

            let operand_expected = !previous.map_or(false, |p| p.ends_operand() && !after_function);
            match token {
                Token::Op(Op::Plus) if operand_expected => continue,
                Token::Op(Op::Minus) if operand_expected => tokens.push(Token::Op(Op::Neg)),
                Token::Op(_) if operand_expected => {
                    return Err(Error::parse(format!(
                        "operator {:?} is missing its left operand",
                        token
                    )))
                }
                Token::Value(_) | Token::LParen if !operand_expected && !after_function => {
                    tokens.push(Token::Op(Op::Mul));
                    tokens.push(token);
                }
                token => tokens.push(token),
            }
        }
        if let Some(Token::Value(name)) = tokens.last() {
            if FUNCTIONS.contains_key(name.as_str()) {
                return Err(Error::parse(format!(
                    "function '{}' requires parentheses",
                    name
                )));
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        while let Some(&c) = self.input.peek() {
            if c.is_whitespace() {
                self.input.next();
            } else {
                break;
            }
        }
        let c = match self.input.next() {
            Some(c) => c,
            None => return Ok(None),
        };
        let token = match c {
            c if c.is_ascii_digit() || c == '.' => Token::Value(self.number(c)?),
            c if is_variable_start(c) => {
                let mut ident = String::new();
                ident.push(c);
                while let Some(&c) = self.input.peek() {
                    if is_variable_part(c) {
                        self.input.next();
                        ident.push(c);
                    } else {
                        break;
                    }
                }
                Token::Value(ident)
            }
            '+' => Token::Op(Op::Plus),
            '-' => Token::Op(Op::Minus),
            '*' if self.input.peek() == Some(&'*') => {
                self.input.next();
                Token::Op(Op::Exp)
            }
            '*' => Token::Op(Op::Mul),
            '/' => Token::Op(Op::Div),
            '^' => Token::Op(Op::Exp),
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(Error::parse(format!(
                    "unexpected character in input: {}",
                    other
                )));
            }
        };
        Ok(Some(token))
    }

    /// Lex a float literal starting with `first`
    fn number(&mut self, first: char) -> Result<String, Error> {
        let mut literal = String::new();
        literal.push(first);
        let mut has_dot = first == '.';
        while let Some(&c) = self.input.peek() {
            match c {
                '0'..='9' => literal.push(c),
                '.' if !has_dot => {
                    has_dot = true;
                    literal.push(c);
                }
                '.' => return Err(Error::parse(format!("invalid number {}.", literal))),
                _ => break,
            }
            self.input.next();
        }

        if let Some(&marker) = self.input.peek() {
            if (marker == 'e' || marker == 'E') && self.exponent_follows() {
                literal.push(marker);
                self.input.next();
                if let Some(&sign) = self.input.peek() {
                    if sign == '+' || sign == '-' {
                        literal.push(sign);
                        self.input.next();
                    }
                }
                while let Some(&c) = self.input.peek() {
                    if c.is_ascii_digit() {
                        literal.push(c);
                        self.input.next();
                    } else {
                        break;
                    }
                }
            }
        }

        if literal == "." {
            return Err(Error::parse("invalid number ."));
        }
        Ok(literal)
    }

    /// Is the `e` under the cursor the start of an exponent? `2e` alone
    /// is `2*e`, `2e3` and `2e-3` are literals.
    fn exponent_follows(&self) -> bool {
        let mut ahead = self.input.clone();
        ahead.next();
        match ahead.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+') | Some('-') => ahead.next().map_or(false, |c| c.is_ascii_digit()),
            _ => false,
        }
    }
}

/// Check if `c` can appear at the first character of a symbol
fn is_variable_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Check if `c` can appear inside a symbol
fn is_variable_part(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
