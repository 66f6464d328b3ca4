use std::{convert::Infallible, fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    LIST_MEMBER_KEY_VALUE_SPLITTER, LIST_MEMBERS_SEPARATOR, ParseLimits, TraceStateError,
    diagnostics::{self, DropReason},
    validate::{is_valid_key, is_valid_value},
};

/// `tracestate` 传播值：按“最近写入者在前”排序、键唯一的不可变条目列表。
///
/// # 设计背景（Why）
/// - 同一个上下文值会被交给大量并发 Span；任何一次“修改”都不能被其他持有者观察到。
/// - W3C 要求新增或更新的键移动到列表最前端，下游按位置判断供应商优先级。
///
/// # 逻辑解析（How）
/// - 内部以 `Arc<[TraceStateEntry]>` 存储，下标 0 为最近写入的条目；
/// - `set`/`unset` 总是分配新的切片（写时复制），从不触碰共享存储；
/// - 克隆只增加引用计数，可在线程间自由传递。
///
/// # 契约说明（What）
/// - **解析**：非法成员静默丢弃，超长头部整体丢弃，超额条目在完整解析后截断，均不返回错误；
/// - **更新**：`set` 不重新校验语法、不强制条目上限，由调用方负责约束；
/// - **相等性**：`PartialEq`/`Hash` 区分顺序，与序列化结果一致。
///
/// # 风险提示（Trade-offs）
/// - 条目上限仅在解析时生效；长生命周期进程持续 `set` 新键时，序列化结果可能超出可传输长度。
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct TraceStateValue {
    entries: Arc<[TraceStateEntry]>,
}

impl TraceStateValue {
    /// 创建空值。
    pub fn new() -> Self {
        Self::default()
    }

    /// 按 W3C 限额解析原始头部。
    ///
    /// `None` 与空串均得到空值。
    pub fn parse(raw: Option<&str>) -> Self {
        Self::parse_with(raw, &ParseLimits::W3C)
    }

    /// 按给定限额解析原始头部。
    ///
    /// # 契约说明
    /// - **输入参数**：`raw` 为已从载体中取出的头部文本，视为不可信输入；
    /// - **长度检查**：在任何校验之前按 UTF-16 码元计数比较原始长度（ASCII 下即字符数），
    ///   超限即返回空值，不做部分恢复；非 ASCII 垃圾成员不会把合法头部挤出上限；
    /// - **成员处理**：按 `,` 切分并去除两侧空白，在首个 `=` 处拆分键值，任一侧不合法即丢弃该成员；
    /// - **顺序**：自尾向头插入有序表，已有键只更新值不移动位置，因此线上顺序原样保留；
    /// - **截断**：全部成员入表后才按上限保留最靠前（最近）的条目，仅截断一次。
    pub fn parse_with(raw: Option<&str>, limits: &ParseLimits) -> Self {
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return Self::new();
        };
        let max_len = limits.max_header_len();
        // UTF-8 字节数不小于 UTF-16 码元数，字节数未超限时无需逐字符计数。
        if raw.len() > max_len {
            let len = header_len(raw);
            if len > max_len {
                diagnostics::header_discarded(len, max_len);
                return Self::new();
            }
        }

        // 自尾向头构建，`ordered` 中下标 0 为最久未更新的条目。
        let mut ordered: Vec<TraceStateEntry> = Vec::new();
        for part in raw.rsplit(LIST_MEMBERS_SEPARATOR) {
            let Some(entry) = parse_member(part) else {
                continue;
            };
            match ordered.iter_mut().find(|current| current.key == entry.key) {
                Some(existing) => existing.value = entry.value,
                None => ordered.push(entry),
            }
        }
        ordered.reverse();

        if ordered.len() > limits.max_entries() {
            diagnostics::entries_truncated(ordered.len(), limits.max_entries());
            ordered.truncate(limits.max_entries());
        }

        Self {
            entries: ordered.into(),
        }
    }

    /// 查询键对应的值。
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// 判断是否存在指定键。
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 返回写入 `key=value` 后的新值；`key` 成为最近条目。
    ///
    /// # 契约说明
    /// - 若键已存在，先移除旧位置再插入最前端；
    /// - 不做语法校验，也不强制条目上限；需要校验时使用 [`Self::try_set`]；
    /// - 接收者保持不变。
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(TraceStateEntry::new(key, value));
        for current in self.entries.iter() {
            if current.key != entries[0].key {
                entries.push(current.clone());
            }
        }
        Self {
            entries: entries.into(),
        }
    }

    /// 校验键值语法后再执行 [`Self::set`]。
    ///
    /// # 契约说明
    /// - **返回值**：键或值不合法时返回 [`TraceStateError`]，接收者与返回值均不产生新状态；
    /// - **适用场景**：值来自外部配置或用户输入，需要在写入前拒绝而非带病传播。
    pub fn try_set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, TraceStateError> {
        let entry = TraceStateEntry::new(key, value);
        entry.validate()?;
        Ok(self.set(entry.key, entry.value))
    }

    /// 返回移除 `key` 后的新值；键不存在时返回等价副本。
    pub fn unset(&self, key: &str) -> Self {
        if !self.contains_key(key) {
            return self.clone();
        }
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.key != key)
                .cloned()
                .collect(),
        }
    }

    /// 渲染为线格式：`key=value` 以 `,` 连接，最近条目在前；空值得到空串。
    pub fn serialize(&self) -> String {
        let capacity = self
            .entries
            .iter()
            .map(|entry| entry.key.len() + entry.value.len() + 2)
            .sum::<usize>();
        let mut header = String::with_capacity(capacity);
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                header.push(LIST_MEMBERS_SEPARATOR);
            }
            header.push_str(&entry.key);
            header.push(LIST_MEMBER_KEY_VALUE_SPLITTER);
            header.push_str(&entry.value);
        }
        header
    }

    /// 按“最近在前”顺序迭代全部条目。
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TraceStateEntry> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// 按“最近在前”顺序迭代全部键。
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + DoubleEndedIterator {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// 条目数量。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 头部长度，以 UTF-16 码元计。
fn header_len(raw: &str) -> usize {
    raw.encode_utf16().count()
}

/// 成员两侧可去除的空白：Unicode 空白与行终止符，含 U+FEFF，不含 U+0085。
fn is_member_whitespace(ch: char) -> bool {
    (ch.is_whitespace() && ch != '\u{85}') || ch == '\u{feff}'
}

fn parse_member(part: &str) -> Option<TraceStateEntry> {
    let member = part.trim_matches(is_member_whitespace);
    if member.is_empty() {
        return None;
    }
    let Some((key, value)) = member.split_once(LIST_MEMBER_KEY_VALUE_SPLITTER) else {
        diagnostics::member_dropped(DropReason::MissingSeparator, None);
        return None;
    };
    if !is_valid_key(key) {
        diagnostics::member_dropped(DropReason::InvalidKey, Some(key));
        return None;
    }
    if !is_valid_value(value) {
        diagnostics::member_dropped(DropReason::InvalidValue, Some(key));
        return None;
    }
    Some(TraceStateEntry::new(key, value))
}

impl fmt::Debug for TraceStateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|entry| (&entry.key, &entry.value)))
            .finish()
    }
}

impl fmt::Display for TraceStateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for TraceStateValue {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(raw)))
    }
}

impl From<&str> for TraceStateValue {
    fn from(raw: &str) -> Self {
        Self::parse(Some(raw))
    }
}

impl Serialize for TraceStateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&TraceStateValue::serialize(self))
    }
}

impl<'de> Deserialize<'de> for TraceStateValue {
    /// 反序列化同样走 fail-open 解析，不合法内容被丢弃而非报错。
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(Some(&raw)))
    }
}

/// 单个 `tracestate` 条目。
///
/// # 契约说明（What）
/// - `key` 遵循 W3C 键语法；`value` 为可打印 ASCII，且不含逗号或等号；
/// - 直接构造不做校验，调用 [`Self::validate`] 成功后方可视为线格式合法。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TraceStateEntry {
    pub key: String,
    pub value: String,
}

impl TraceStateEntry {
    /// 创建新的 `tracestate` 条目。
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// 校验条目是否符合 W3C 语法。
    pub fn validate(&self) -> Result<(), TraceStateError> {
        if !is_valid_key(&self.key) {
            return Err(TraceStateError::InvalidKey {
                key: self.key.clone(),
            });
        }
        if !is_valid_value(&self.value) {
            return Err(TraceStateError::InvalidValue {
                key: self.key.clone(),
            });
        }
        Ok(())
    }
}
