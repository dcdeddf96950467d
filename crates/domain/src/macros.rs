/// 必須チェック付き String Newtype を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `new()`: 空白のみかどうかの存在チェック（値そのものは加工せず保持する。空なら [`DomainError::Validation`](crate::DomainError::Validation)）
/// - `as_str()`: 文字列参照
/// - `into_string()`: 所有権を持つ文字列に変換
/// - `Display` impl
///
/// 勤怠システムは存在チェック以上の検証を行わないため、長さや書式は問わない。
///
/// # 引数
///
/// - `$label`: エラーメッセージに使うフィールド名（例: `"user_id"`）
///
/// # 使用例
///
/// ```rust
/// use attendance_domain::attendance::UserId;
///
/// let id = UserId::new(" u1 ").unwrap();
/// assert_eq!(id.as_str(), " u1 ");
/// assert!(UserId::new("   ").is_err());
/// ```
macro_rules! define_required_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl $Name {
            /// フィールド名（エラーメッセージ用）
            pub const LABEL: &'static str = $label;

            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into();

                if value.trim().is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{} は必須です",
                        $label
                    )));
                }

                Ok(Self(value))
            }

            /// 未指定（`None`）も欠落として扱う
            pub fn from_option(value: Option<String>) -> Result<Self, $crate::DomainError> {
                Self::new(value.unwrap_or_default())
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// 所有権を持つ文字列に変換する
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
