use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::error::PurgeError;
use super::pattern::{PatternShape, WildcardPattern};

/// 时间戳类型
pub type Timestamp = DateTime<Utc>;

/// 位置参数的最大个数: fileMatch folderMatch ignoreMatch olderThan newerThan
pub const MAX_TOKENS: usize = 5;

/// 命令格式说明
pub const COMMAND_GRAMMAR: &str = "filematch [foldermatch] [ignorematch] [olderThan] [newerThan]";

/// 带时间的日期格式（参数中不能含空格，因此使用 `T` 分隔）
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// 纯日期格式，按本地时区的零点解释
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%d.%m.%Y"];

/// 经过校验的搜索条件
///
/// 构造完成后不可变，并始终满足 `newer_than <= older_than`。
#[derive(Debug, Clone)]
pub struct Criteria {
    file_match: WildcardPattern,
    folder_match: WildcardPattern,
    ignore_match: WildcardPattern,
    older_than: Timestamp,
    newer_than: Timestamp,
    valid: bool,
}

impl Criteria {
    /// 将一行输入按单个空格拆分后构造搜索条件
    ///
    /// 模式本身无法包含空格。
    pub fn parse_line(line: &str) -> Self {
        let tokens: Vec<&str> = line.split(' ').collect();
        Self::from_tokens(tokens.as_slice())
    }

    /// 按位置参数构造搜索条件
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut criteria = Self::defaults();

        if tokens.is_empty() || tokens.len() > MAX_TOKENS {
            return criteria;
        }

        let token = |i: usize| tokens.get(i).map(|t| t.as_ref());

        if let Some(file) = token(0) {
            criteria.file_match = WildcardPattern::compile(file);
        }
        if let Some(folder) = token(1) {
            criteria.folder_match = WildcardPattern::compile(folder);
        }
        if let Some(ignore) = token(2) {
            criteria.ignore_match = WildcardPattern::compile(ignore);
        }
        if let Some(older) = token(3) {
            criteria.older_than = parse_date_or_min(older);
        }
        if let Some(newer) = token(4) {
            criteria.newer_than = parse_date_or_min(newer);
        }

        if criteria.newer_than > criteria.older_than {
            std::mem::swap(&mut criteria.newer_than, &mut criteria.older_than);
        }

        // 空白的文件模式会匹配整棵目录树中的所有文件
        criteria.valid = !matches!(criteria.file_match.shape(), PatternShape::MatchAll);
        criteria
    }

    fn defaults() -> Self {
        Self {
            file_match: WildcardPattern::compile(""),
            folder_match: WildcardPattern::match_all(),
            ignore_match: WildcardPattern::match_none(),
            older_than: Utc::now(),
            newer_than: DateTime::<Utc>::MIN_UTC,
            valid: false,
        }
    }

    /// 有效时返回自身，否则返回 `InvalidCriteria`
    pub fn validated(self) -> Result<Self, PurgeError> {
        if self.valid {
            Ok(self)
        } else {
            Err(PurgeError::InvalidCriteria {
                reason: format!("需要 1 到 {} 个参数且文件模式不能为空白: {}", MAX_TOKENS, COMMAND_GRAMMAR),
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn file_match(&self) -> &WildcardPattern {
        &self.file_match
    }

    pub fn folder_match(&self) -> &WildcardPattern {
        &self.folder_match
    }

    pub fn ignore_match(&self) -> &WildcardPattern {
        &self.ignore_match
    }

    pub fn older_than(&self) -> Timestamp {
        self.older_than
    }

    pub fn newer_than(&self) -> Timestamp {
        self.newer_than
    }

    /// 文件名是否被选中: 匹配文件模式且不匹配忽略模式
    pub fn selects_name(&self, name: &str) -> bool {
        self.file_match.is_match(name) && !self.ignore_match.is_match(name)
    }

    /// 修改时间是否落在开区间 (newer_than, older_than) 内
    pub fn in_window(&self, modified: Timestamp) -> bool {
        self.newer_than < modified && modified < self.older_than
    }

    /// 是否进入该子目录
    pub fn descends_into(&self, folder_name: &str) -> bool {
        self.folder_match.is_match(folder_name)
    }
}

/// 解析日期参数，失败时返回可表示的最小时间
///
/// 注意这会导致不对称: 无法解析的 olderThan 排除所有文件，而无法解析的 newerThan 不排除任何文件。
pub fn parse_date_or_min(token: &str) -> Timestamp {
    parse_date(token).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// 按本地时区解析日期参数
pub fn parse_date(token: &str) -> Option<Timestamp> {
    let token = token.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
