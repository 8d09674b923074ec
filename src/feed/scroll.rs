/// 捲動事件當下的位置，單位與文件高度相同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollPosition {
    pub scroll_top: u64,
    pub scroll_height: u64,
    pub client_height: u64,
}

impl ScrollPosition {
    pub fn new(scroll_top: u64, scroll_height: u64, client_height: u64) -> Self {
        ScrollPosition {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// 視窗底部距離文件底部是否在 `threshold` 以內
    pub fn is_near_bottom(&self, threshold: u64) -> bool {
        self.scroll_top.saturating_add(self.client_height)
            >= self.scroll_height.saturating_sub(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_near_bottom() {
        // 1000 高的文件，視窗 300
        assert!(!ScrollPosition::new(0, 1000, 300).is_near_bottom(5));
        assert!(!ScrollPosition::new(694, 1000, 300).is_near_bottom(5));
        assert!(ScrollPosition::new(695, 1000, 300).is_near_bottom(5));
        assert!(ScrollPosition::new(700, 1000, 300).is_near_bottom(5));
        assert!(ScrollPosition::new(690, 1000, 300).is_near_bottom(10));
    }

    #[test]
    fn test_short_document() {
        assert!(ScrollPosition::new(0, 3, 0).is_near_bottom(5));
        assert!(ScrollPosition::new(0, 20, 30).is_near_bottom(0));
        assert!(ScrollPosition::default().is_near_bottom(5));
    }
}
