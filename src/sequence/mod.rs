//! # 文件序列模块
//!
//! 帧范围编解码、序列检测与模板展开。
//!
//! ## 依赖关系
//! - 被 `models/`, `batch/`, `commands/` 使用
//! - 子模块: range, detect, template

pub mod detect;
pub mod range;
pub mod template;

pub use detect::{detect_sequence, enumerate_bases, get_sequence, DetectOptions, Sequence};
pub use range::{
    detect_contiguous_subrange, digit_count, encode_range_string, pad_frame, parse_frame_list,
    parse_range_string, range_padding, FrameSet,
};
pub use template::expand_template;
