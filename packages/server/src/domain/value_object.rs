//! 値オブジェクト
//!
//! 生の文字列をそのまま持ち回らず、検証済みの型として扱います。

use std::fmt;

use super::error::ValueObjectError;

/// クライアント識別子
///
/// 空文字のみ不可。中身は不透明な文字列として扱い、長さや文字種は問わない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyClientId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文（空文字は不可）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_valid() {
        // テスト項目: 通常の文字列から ClientId が生成できる
        // given (前提条件):
        let raw = "alice".to_string();

        // when (操作):
        let result = ClientId::new(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_client_id_empty_rejected() {
        // テスト項目: 空文字の ClientId は拒否される
        // given (前提条件):
        let empty = String::new();

        // when (操作):
        let result = ClientId::try_from(empty);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyClientId));
    }

    #[test]
    fn test_client_id_is_opaque() {
        // テスト項目: 空白のみ・51 文字・マルチバイトの ID も、そのまま受け付けられる
        // given (前提条件):
        let blank = "   ".to_string();
        let long = "a".repeat(51);
        let multibyte = "あ".repeat(60);

        // when (操作):
        let blank_result = ClientId::new(blank);
        let long_result = ClientId::new(long.clone());
        let multibyte_result = ClientId::new(multibyte.clone());

        // then (期待する結果):
        assert_eq!(blank_result.unwrap().as_str(), "   ");
        assert_eq!(long_result.unwrap().as_str(), long);
        assert_eq!(multibyte_result.unwrap().as_str(), multibyte);
    }

    #[test]
    fn test_message_text_empty_rejected() {
        // テスト項目: 空のメッセージは拒否され、空白を含む本文はそのまま保持される
        // given (前提条件):
        let empty = String::new();
        let spaced = " hi ".to_string();

        // when (操作):
        let empty_result = MessageText::new(empty);
        let spaced_result = MessageText::new(spaced);

        // then (期待する結果):
        assert_eq!(empty_result, Err(ValueObjectError::EmptyMessage));
        assert_eq!(spaced_result.unwrap().as_str(), " hi ");
    }
}
