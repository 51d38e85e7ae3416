use crate::XdotError;

/// xdot 属性文本的单遍词法器。
///
/// 同一段字节既可能是数字也可能是字符串前缀（`5 -black`），
/// 因此由解析器指定期望的单元类别。
pub struct XdotLexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> XdotLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// 当前字节偏移，用于错误定位。
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// 读取下一个操作码单词；输入结束时返回 `None`。
    pub fn next_keyword(&mut self) -> Result<Option<(usize, &'a str)>, XdotError> {
        Ok(self.next_word())
    }

    pub fn read_int(&mut self) -> Result<i64, XdotError> {
        let (offset, word) = self
            .next_word()
            .ok_or_else(|| malformed(self.pos, "unexpected end of input, expected integer"))?;
        word.parse::<i64>()
            .map_err(|_| malformed(offset, format!("`{word}` is not an integer")))
    }

    pub fn read_float(&mut self) -> Result<f64, XdotError> {
        let (offset, word) = self
            .next_word()
            .ok_or_else(|| malformed(self.pos, "unexpected end of input, expected number"))?;
        match word.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(malformed(offset, format!("`{word}` is not a number"))),
        }
    }

    /// 读取 `N -<N 个字节>` 形式的字符串，内容可包含空白与引号。
    pub fn read_string(&mut self) -> Result<&'a str, XdotError> {
        let start = {
            self.skip_whitespace();
            self.pos
        };
        let length = self.read_int()?;
        let length = usize::try_from(length)
            .map_err(|_| malformed(start, format!("negative string length {length}")))?;

        self.skip_whitespace();
        if self.source.as_bytes().get(self.pos) != Some(&b'-') {
            return Err(malformed(self.pos, "expected `-` after string length"));
        }
        self.pos += 1;

        let remaining = self.source.len() - self.pos;
        if length > remaining {
            return Err(malformed(
                start,
                format!("declared string length {length} exceeds remaining input {remaining}"),
            ));
        }
        let end = self.pos + length;
        let text = self.source.get(self.pos..end).ok_or_else(|| {
            malformed(start, "string length splits a UTF-8 character")
        })?;
        self.pos = end;
        Ok(text)
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn next_word(&mut self) -> Option<(usize, &'a str)> {
        self.skip_whitespace();
        let bytes = self.source.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if start == self.pos {
            None
        } else {
            Some((start, &self.source[start..self.pos]))
        }
    }
}

fn malformed(offset: usize, message: impl Into<String>) -> XdotError {
    XdotError::MalformedToken {
        offset,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_accept_integer_and_float_forms() {
        let mut lexer = XdotLexer::new("  3 3.14 -1.5e2\t7 ");
        assert_eq!(lexer.read_float().unwrap(), 3.0);
        assert_eq!(lexer.read_float().unwrap(), 3.14);
        assert_eq!(lexer.read_float().unwrap(), -150.0);
        assert_eq!(lexer.read_int().unwrap(), 7);
        assert_eq!(lexer.next_keyword().unwrap(), None);
    }

    #[test]
    fn strings_are_length_prefixed_bytes() {
        let mut lexer = XdotLexer::new("11 -hello world 5 -a\"b c E");
        assert_eq!(lexer.read_string().unwrap(), "hello world");
        assert_eq!(lexer.read_string().unwrap(), "a\"b c");
        assert_eq!(lexer.next_keyword().unwrap(), Some((25, "E")));
        assert_eq!(lexer.next_keyword().unwrap(), None);
    }

    #[test]
    fn string_length_counts_utf8_bytes() {
        let mut lexer = XdotLexer::new("6 -节点");
        assert_eq!(lexer.read_string().unwrap(), "节点");

        let mut split = XdotLexer::new("2 -节点");
        assert!(matches!(
            split.read_string(),
            Err(XdotError::MalformedToken { .. })
        ));
    }

    #[test]
    fn overlong_string_is_malformed() {
        let mut lexer = XdotLexer::new("10 -short");
        let err = lexer.read_string().unwrap_err();
        match err {
            XdotError::MalformedToken { offset, message } => {
                assert_eq!(offset, 0);
                assert!(message.contains("exceeds"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_numbers_report_offset() {
        let mut lexer = XdotLexer::new("1 x2");
        assert_eq!(lexer.read_int().unwrap(), 1);
        let err = lexer.read_float().unwrap_err();
        assert_eq!(
            err,
            XdotError::MalformedToken {
                offset: 2,
                message: "`x2` is not a number".to_string(),
            }
        );
        assert!(XdotLexer::new("2.5").read_int().is_err());
        assert!(XdotLexer::new("").read_int().is_err());
    }

    #[test]
    fn string_requires_dash_marker() {
        let mut lexer = XdotLexer::new("3 abc");
        assert!(lexer.read_string().is_err());
    }
}
