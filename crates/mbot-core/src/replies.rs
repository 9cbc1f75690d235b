//! Reply texts sent back to the chat.

pub const SET_DONE: &str = "已重新設定簽到記錄";
pub const ALL_PRESENT: &str = "全班已簽到";
pub const FORMAT_SET: &str = "已設定簽到格式";
pub const EXAMPLE_SET: &str = "已設定簽到範例";
pub const ROSTER_CLEARED: &str = "已清除成員學號";

pub const HELP: &str = "指令列表：

++：簽到
==：清除/設定簽到記錄
>>：顯示完整簽到訊息
--：顯示未簽到成員
??：顯示簽到格式
!!：顯示簽到範例
@@：顯示幫助訊息

設定指令：
mbot config format <格式>
mbot config example <範例>
mbot config ids <1,2,3 | 1-30 | clear>";

pub const ABOUT: &str = "關於 mbot 簽到機器人：

在群組中貼上含有「學號」的簽到訊息，mbot 會依學號排序整理，並列出尚未簽到的成員。";

/// Confirmation after a successful `add`.
pub fn checked_in(ids: &[u64]) -> String {
    format!("{} 完成簽到", join_ids(ids))
}

/// Absentee list.
pub fn absent(ids: &[u64]) -> String {
    format!("未簽到：{}", join_ids(ids))
}

/// Confirmation after the roster is configured from `ids`.
pub fn roster_set(ids: &str) -> String {
    format!("已設定成員學號：{ids}")
}

/// Join ids as `1, 2, 3`.
pub fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
