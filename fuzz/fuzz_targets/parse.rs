#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_tracestate::{MAX_ENTRIES, MAX_HEADER_LEN, TraceStateValue};

/// Fuzz 输入：一段任意头部，外加一次随后执行的写入/删除。
///
/// - **Why**：`tracestate` 来自不可信的上游，解析器必须对任意字节序列保持 fail-open，不得 panic；
/// - **How**：先解析原始头部，再执行一次 `set` 与 `unset`，检查上限、不可变与不动点性质；
/// - **What**：任意断言失败都意味着契约被破坏。
#[derive(Debug, Arbitrary)]
struct ParseCase<'a> {
    raw: &'a str,
    key: &'a str,
    value: &'a str,
}

fuzz_target!(|case: ParseCase<'_>| {
    let state = TraceStateValue::parse(Some(case.raw));
    assert!(state.len() <= MAX_ENTRIES);
    if case.raw.encode_utf16().count() > MAX_HEADER_LEN {
        assert!(state.is_empty());
    }

    let header = state.serialize();
    assert!(header.len() <= case.raw.len());
    assert_eq!(TraceStateValue::parse(Some(&header)), state);

    let updated = state.set(case.key, case.value);
    assert_eq!(updated.get(case.key), Some(case.value));
    assert_eq!(state.serialize(), header);

    let removed = updated.unset(case.key);
    assert!(!removed.contains_key(case.key));
});
