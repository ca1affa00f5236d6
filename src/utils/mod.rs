pub mod url_validator;

/// 随机 slug 的默认长度（URL-safe 字符）
pub const DEFAULT_SLUG_LENGTH: usize = 8;

pub fn generate_random_slug(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    // 生成指定长度的随机字符串
    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 校验 slug 格式是否合法（仅字母、数字、下划线、连字符）
///
/// 非法 slug 直接 404，不进入数据库查询。
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_slug_length() {
        for len in [1, 8, 16, 32] {
            assert_eq!(generate_random_slug(len).len(), len);
        }
    }

    #[test]
    fn test_generate_random_slug_charset() {
        let slug = generate_random_slug(64);
        assert!(slug.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_slug_is_valid() {
        for _ in 0..100 {
            assert!(is_valid_slug(&generate_random_slug(DEFAULT_SLUG_LENGTH)));
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("abc123"));
        assert!(is_valid_slug("with_underscore"));
        assert!(is_valid_slug("with-hyphen"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("has/slash"));
        assert!(!is_valid_slug("sql'inject"));
        assert!(!is_valid_slug(&"x".repeat(65)));
    }
}
