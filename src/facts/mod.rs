//! 环境事实 - 场景判断所需的主机状态
//!
//! `PredicateProvider` 是探测接口，`EnvironmentFacts::collect` 按已开启的功能
//! 每项最多探测一次。

pub mod system;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Configuration;

pub use system::{count_deadlines_within, parse_build_number, SystemProbe};

/// 主机状态探测接口
///
/// 探测不到（例如没有安装管理代理）时返回 `false` / `0`，不返回错误。
pub trait PredicateProvider {
    /// 注册表中是否存在挂起的重启
    fn registry_reboot_pending(&self) -> bool;

    /// 管理代理（服务）是否报告挂起的重启
    fn service_reboot_pending(&self) -> bool;

    /// 开机天数
    fn uptime_days(&self) -> i64;

    /// 当前系统的 build 号
    fn running_build_number(&self) -> u32;

    /// 截止时间落在当前时间 ±24 小时内的更新数量
    fn recent_or_upcoming_deadline_count(&self) -> usize;
}

/// 一次运行中采集到的主机状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFacts {
    pub registry_reboot_pending: bool,
    pub service_reboot_pending: bool,
    pub uptime_days: i64,
    pub running_build_number: u32,
    pub recent_or_upcoming_deadline_count: usize,
}

impl EnvironmentFacts {
    /// 只探测已开启功能需要的事实，未探测的字段保持默认值
    pub fn collect(provider: &dyn PredicateProvider, config: &Configuration) -> Self {
        let features = &config.features;
        let mut facts = Self::default();

        if features.upgrade_os {
            facts.running_build_number = provider.running_build_number();
        }
        if features.pending_reboot_uptime {
            facts.uptime_days = provider.uptime_days();
        }
        if features.pending_reboot_check {
            // both probes always run, the registry result does not short-circuit the service check
            facts.registry_reboot_pending = provider.registry_reboot_pending();
            facts.service_reboot_pending = provider.service_reboot_pending();
        }
        if features.recent_deadline_check {
            facts.recent_or_upcoming_deadline_count = provider.recent_or_upcoming_deadline_count();
        }

        debug!(?facts, "Collected environment facts");
        facts
    }

    /// 探测全部事实（诊断用）
    pub fn probe_all(provider: &dyn PredicateProvider) -> Self {
        Self {
            registry_reboot_pending: provider.registry_reboot_pending(),
            service_reboot_pending: provider.service_reboot_pending(),
            uptime_days: provider.uptime_days(),
            running_build_number: provider.running_build_number(),
            recent_or_upcoming_deadline_count: provider.recent_or_upcoming_deadline_count(),
        }
    }
}

/// 固定返回值的探测器，同时记录每项被调用的次数
#[derive(Debug, Default)]
pub struct StaticFacts {
    pub facts: EnvironmentFacts,
    calls: std::cell::RefCell<Vec<&'static str>>,
}

impl StaticFacts {
    pub fn new(facts: EnvironmentFacts) -> Self {
        Self {
            facts,
            calls: Default::default(),
        }
    }

    /// 按调用顺序返回被调用过的探测名
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }
}

impl PredicateProvider for StaticFacts {
    fn registry_reboot_pending(&self) -> bool {
        self.record("registry_reboot_pending");
        self.facts.registry_reboot_pending
    }

    fn service_reboot_pending(&self) -> bool {
        self.record("service_reboot_pending");
        self.facts.service_reboot_pending
    }

    fn uptime_days(&self) -> i64 {
        self.record("uptime_days");
        self.facts.uptime_days
    }

    fn running_build_number(&self) -> u32 {
        self.record("running_build_number");
        self.facts.running_build_number
    }

    fn recent_or_upcoming_deadline_count(&self) -> usize {
        self.record("recent_or_upcoming_deadline_count");
        self.facts.recent_or_upcoming_deadline_count
    }
}
