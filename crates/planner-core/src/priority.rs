//! 成品優先順序（FIFO）

use serde::{Deserialize, Serialize};

/// 成品優先順序
///
/// 排在前面的成品優先取用共享庫存。順序由呼叫端決定，不做排序；
/// 重複代碼只保留第一次出現的位置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityOrder {
    fg_codes: Vec<String>,
}

impl PriorityOrder {
    /// 由代碼序列建立優先順序（去除空白、去重）
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order = Self::default();
        for code in codes {
            order.push(code.as_ref());
        }
        order
    }

    /// 追加到最後，已存在或空白代碼則忽略
    pub fn push(&mut self, fg_code: &str) -> bool {
        let code = fg_code.trim();
        if code.is_empty() || self.contains(code) {
            return false;
        }
        self.fg_codes.push(code.to_string());
        true
    }

    /// 移除代碼，後面的成品依序前移
    pub fn remove(&mut self, fg_code: &str) -> bool {
        let before = self.fg_codes.len();
        self.fg_codes.retain(|c| c != fg_code);
        before != self.fg_codes.len()
    }

    pub fn contains(&self, fg_code: &str) -> bool {
        self.fg_codes.iter().any(|c| c == fg_code)
    }

    /// 查詢優先位置（0 為最優先）
    pub fn position(&self, fg_code: &str) -> Option<usize> {
        self.fg_codes.iter().position(|c| c == fg_code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fg_codes.iter().map(|c| c.as_str())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.fg_codes
    }

    pub fn len(&self) -> usize {
        self.fg_codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fg_codes.is_empty()
    }

    pub fn clear(&mut self) {
        self.fg_codes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let order = PriorityOrder::new(["FG-C", "FG-A", "FG-B"]);
        assert_eq!(order.as_slice(), &["FG-C", "FG-A", "FG-B"]);
        assert_eq!(order.position("FG-A"), Some(1));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let order = PriorityOrder::new(["FG-B", "FG-A", "FG-B", " FG-A ", ""]);
        assert_eq!(order.as_slice(), &["FG-B", "FG-A"]);
    }

    #[test]
    fn test_remove_shifts_later_entries() {
        let mut order = PriorityOrder::new(["FG-A", "FG-B", "FG-C"]);
        assert!(order.remove("FG-B"));
        assert!(!order.remove("FG-X"));
        assert_eq!(order.position("FG-C"), Some(1));
    }
}
