//! 成品顏色配置
//!
//! 依首次出現順序分配固定色盤中的顏色，超過色盤長度後循環使用。

/// 固定色盤
pub const FG_COLORS: [&str; 20] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94",
    "#f7b6d2", "#c7c7c7", "#dbdb8d", "#9edae5",
];

/// 成品顏色表
#[derive(Debug, Clone, Default)]
pub struct FgPalette {
    assigned: Vec<(String, &'static str)>,
}

impl FgPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依序登記成品代碼
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut palette = Self::new();
        for code in codes {
            palette.color_for(code.as_ref());
        }
        palette
    }

    /// 取得（必要時分配）成品顏色
    pub fn color_for(&mut self, fg_code: &str) -> &'static str {
        if let Some(color) = self.get(fg_code) {
            return color;
        }
        let color = FG_COLORS[self.assigned.len() % FG_COLORS.len()];
        self.assigned.push((fg_code.to_string(), color));
        color
    }

    /// 查詢已分配的顏色
    pub fn get(&self, fg_code: &str) -> Option<&'static str> {
        self.assigned
            .iter()
            .find(|(code, _)| code == fg_code)
            .map(|(_, color)| *color)
    }

    /// 重設（配方清空時使用）
    pub fn clear(&mut self) {
        self.assigned.clear();
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
