//! # 输入收集器
//!
//! 将命令行输入（文件或目录）转换为检测到的序列列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 递归目录搜索
//! - glob 模式过滤
//! - 多目录并行检测，结果保持输入顺序
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs`, `commands/rename.rs` 调用
//! - 使用 `sequence/detect.rs` 检测序列
//! - 使用 `walkdir` 遍历目录，`rayon` 并行检测

use crate::error::{Result, SeqRenameError};
use crate::sequence::{detect_sequence, enumerate_bases, get_sequence, DetectOptions, Sequence};

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 检测目标
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// 扫描目录中的全部序列
    Dir(PathBuf),
    /// 从单个文件检测所属序列
    File(PathBuf),
}

/// 收集结果
#[derive(Debug, Default)]
pub struct CollectResult {
    /// 检测到的序列（按输入顺序，已去重）
    pub sequences: Vec<Sequence>,
    /// 失败详情 (路径, 错误信息)
    pub failures: Vec<(String, String)>,
}

/// 输入收集器
pub struct InputCollector {
    /// 输入路径
    inputs: Vec<PathBuf>,
    /// 检测选项
    options: DetectOptions,
    /// 名称过滤
    pattern: Option<glob::Pattern>,
    /// 是否递归
    recursive: bool,
    /// 并行作业数
    jobs: usize,
}

impl InputCollector {
    /// 创建新的输入收集器
    pub fn new(inputs: Vec<PathBuf>, options: DetectOptions) -> Self {
        Self {
            inputs,
            options,
            pattern: None,
            recursive: false,
            jobs: 0,
        }
    }

    /// 设置名称过滤模式
    ///
    /// 文件输入匹配文件名；目录中的序列匹配其模板名，e.g. `shot.#.exr`。
    pub fn with_pattern(mut self, pattern: Option<&str>) -> Result<Self> {
        self.pattern = match pattern {
            Some(p) if !p.trim().is_empty() => {
                Some(glob::Pattern::new(p.trim()).map_err(|e| SeqRenameError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };
        Ok(self)
    }

    /// 设置是否递归搜索子目录
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 设置并行作业数（0 = 自动）
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// 收集全部序列
    pub fn collect(&self) -> Result<CollectResult> {
        self.collect_with(|| {})
    }

    /// 收集全部序列，每完成一个检测目标调用一次 `on_target`
    pub fn collect_with<F>(&self, on_target: F) -> Result<CollectResult>
    where
        F: Fn() + Sync + Send,
    {
        let mut result = CollectResult::default();
        let targets = self.targets(&mut result.failures);

        let jobs = if self.jobs == 0 { num_cpus::get() } else { self.jobs };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| SeqRenameError::Other(format!("Failed to build thread pool: {}", e)))?;

        let detected: Vec<Vec<std::result::Result<Sequence, (String, String)>>> = pool.install(|| {
            targets
                .par_iter()
                .map(|target| {
                    let found = self.detect_target(target);
                    on_target();
                    found
                })
                .collect()
        });

        // 同一序列可能经由多个输入到达
        let mut seen = HashSet::new();
        for item in detected.into_iter().flatten() {
            match item {
                Ok(seq) => {
                    let key = (seq.dir.clone(), seq.prefix.clone(), seq.ext.clone());
                    if seen.insert(key) {
                        result.sequences.push(seq);
                    }
                }
                Err(failure) => result.failures.push(failure),
            }
        }

        Ok(result)
    }

    /// 展开输入为检测目标列表
    fn targets(&self, failures: &mut Vec<(String, String)>) -> Vec<Target> {
        let mut targets = Vec::new();

        for input in &self.inputs {
            if input.is_file() {
                if self.matches(input.file_name().and_then(|n| n.to_str()).unwrap_or("")) {
                    targets.push(Target::File(input.clone()));
                }
            } else if input.is_dir() {
                if self.recursive {
                    let walker = WalkDir::new(input)
                        .sort_by_file_name()
                        .into_iter()
                        .filter_map(|e| e.ok())
                        .filter(|e| e.file_type().is_dir());
                    targets.extend(walker.map(|e| Target::Dir(e.path().to_path_buf())));
                } else {
                    targets.push(Target::Dir(input.clone()));
                }
            } else {
                failures.push((
                    input.display().to_string(),
                    SeqRenameError::FileNotFound {
                        path: input.display().to_string(),
                    }
                    .to_string(),
                ));
            }
        }

        targets
    }

    /// 检测单个目标
    fn detect_target(&self, target: &Target) -> Vec<std::result::Result<Sequence, (String, String)>> {
        match target {
            Target::File(path) => vec![detect_sequence(path, &self.options)
                .map_err(|e| (path.display().to_string(), e.to_string()))],
            Target::Dir(dir) => self.detect_dir(dir),
        }
    }

    fn detect_dir(&self, dir: &Path) -> Vec<std::result::Result<Sequence, (String, String)>> {
        let bases = match enumerate_bases(dir, &self.options.delimiter) {
            Ok(bases) => bases,
            Err(e) => return vec![Err((dir.display().to_string(), e.to_string()))],
        };

        bases
            .iter()
            .filter(|base| self.matches(base))
            .map(|base| {
                get_sequence(dir, base, &self.options)
                    .map_err(|e| (dir.join(base).display().to_string(), e.to_string()))
            })
            .collect()
    }

    fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().map_or(true, |p| p.matches(name))
    }
}
