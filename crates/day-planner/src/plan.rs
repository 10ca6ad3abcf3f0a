//! The day plan: named blocks of consecutive slots over the circular day.

use std::fmt;

use anyhow::{Result, bail};
use serde::ser::{Serialize, SerializeMap, Serializer};

use reward_kernel::{Category, GridConfig};

/// Stem of the key given to slots that no task could fill.
pub const IDLE: &str = "idle";

/// A run of consecutive slots assigned to one task.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanBlock {
    /// `category` or `category_k`; unique within a plan.
    pub key: String,
    /// Name of the task the block belongs to.
    pub name: String,
    /// `None` for an idle block.
    pub category: Option<Category>,
    pub start_slot: usize,
    /// Exclusive.
    pub end_slot: usize,
    /// One discretized reward per slot.
    pub rwd: Vec<f64>,
}

impl PlanBlock {
    pub fn len(&self) -> usize {
        self.end_slot - self.start_slot
    }

    pub fn is_empty(&self) -> bool {
        self.end_slot == self.start_slot
    }

    pub fn stem(&self) -> &'static str {
        self.category.map_or(IDLE, |c| c.name())
    }

    pub fn total_reward(&self) -> f64 {
        self.rwd.iter().sum()
    }

    /// `[start, end]` in clock hours.
    pub fn hours(&self, slot_hours: f64) -> [f64; 2] {
        [
            self.start_slot as f64 * slot_hours,
            self.end_slot as f64 * slot_hours,
        ]
    }
}

/// A day plan under construction or, after [`Plan::normalize`], final.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    slot_hours: f64,
    slots_per_day: usize,
    blocks: Vec<PlanBlock>,
}

impl Plan {
    pub fn new(grid: &GridConfig) -> Self {
        Self {
            slot_hours: grid.slot_hours,
            slots_per_day: grid.slots_per_day(),
            blocks: Vec::new(),
        }
    }

    pub fn slot_hours(&self) -> f64 {
        self.slot_hours
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    pub fn blocks(&self) -> &[PlanBlock] {
        &self.blocks
    }

    pub fn block(&self, key: &str) -> Option<&PlanBlock> {
        self.blocks.iter().find(|b| b.key == key)
    }

    /// Block covering `slot`, if any.
    pub fn owner(&self, slot: usize) -> Option<&PlanBlock> {
        self.blocks
            .iter()
            .find(|b| b.start_slot <= slot && slot < b.end_slot)
    }

    pub fn total_reward(&self) -> f64 {
        self.blocks.iter().map(PlanBlock::total_reward).sum()
    }

    fn next_key(&self, stem: &str) -> String {
        match self.blocks.iter().filter(|b| b.stem() == stem).count() {
            0 => stem.to_string(),
            k => format!("{stem}_{k}"),
        }
    }

    /// Add a whole block starting at `start_slot`, one slot per reward.
    pub fn push_block(
        &mut self,
        name: &str,
        category: Option<Category>,
        start_slot: usize,
        rwd: Vec<f64>,
    ) -> &PlanBlock {
        let stem = category.map_or(IDLE, |c| c.name());
        let block = PlanBlock {
            key: self.next_key(stem),
            name: name.to_string(),
            category,
            start_slot,
            end_slot: start_slot + rwd.len(),
            rwd,
        };
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// Give `slot` to task `name`. Extends the block ending at `slot` when
    /// it belongs to the same task, otherwise opens a new block. Returns the
    /// key of the block that received the slot.
    pub fn assign(
        &mut self,
        slot: usize,
        name: &str,
        category: Option<Category>,
        reward: f64,
    ) -> String {
        if let Some(block) = self
            .blocks
            .iter_mut()
            .find(|b| b.end_slot == slot && b.name == name && b.category == category)
        {
            block.end_slot += 1;
            block.rwd.push(reward);
            return block.key.clone();
        }
        self.push_block(name, category, slot, vec![reward]).key.clone()
    }

    /// Sort blocks by start, merge abutting blocks of the same task and
    /// re-key them in time order. Idempotent.
    pub fn normalize(self) -> Plan {
        let Plan {
            slot_hours,
            slots_per_day,
            mut blocks,
        } = self;
        blocks.sort_by_key(|b| b.start_slot);

        let mut merged: Vec<PlanBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            if let Some(last) = merged.last_mut()
                && last.end_slot == block.start_slot
                && last.name == block.name
                && last.category == block.category
            {
                last.end_slot = block.end_slot;
                last.rwd.extend(block.rwd);
                continue;
            }
            merged.push(block);
        }

        let mut plan = Plan {
            slot_hours,
            slots_per_day,
            blocks: Vec::with_capacity(merged.len()),
        };
        for mut block in merged {
            block.key = plan.next_key(block.stem());
            plan.blocks.push(block);
        }
        plan
    }

    /// Verify that the blocks cover `[0, N)` exactly once.
    pub fn check_tiling(&self) -> Result<()> {
        let mut spans: Vec<(usize, usize, &str)> = self
            .blocks
            .iter()
            .map(|b| (b.start_slot, b.end_slot, b.key.as_str()))
            .collect();
        spans.sort_unstable();

        let mut cursor = 0;
        for (start, end, key) in spans {
            if start > cursor {
                bail!("slots {cursor}..{start} are not covered by any block");
            }
            if start < cursor {
                bail!("block '{key}' overlaps slot {start}");
            }
            if end <= start {
                bail!("block '{key}' is empty");
            }
            cursor = end;
        }
        if cursor != self.slots_per_day {
            bail!(
                "blocks end at slot {cursor}, the day has {} slots",
                self.slots_per_day
            );
        }
        Ok(())
    }
}

fn clock(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as u32;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<13} {:<24} {:<20} {:>8}", "time", "block", "task", "reward")?;
        for block in &self.blocks {
            let [start, end] = block.hours(self.slot_hours);
            let mean = if block.is_empty() {
                0.0
            } else {
                block.total_reward() / block.len() as f64
            };
            writeln!(
                f,
                "{}-{}   {:<24} {:<20} {:>8.2}",
                clock(start),
                clock(end),
                block.key,
                block.name,
                mean
            )?;
        }
        write!(f, "total reward: {:.2}", self.total_reward())
    }
}

#[derive(serde::Serialize)]
struct BlockEntry<'a> {
    name: &'a str,
    time: [f64; 2],
    rwd: &'a [f64],
}

/// External shape: an object keyed by block key, in block order.
impl Serialize for Plan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.blocks.len()))?;
        for block in &self.blocks {
            map.serialize_entry(
                &block.key,
                &BlockEntry {
                    name: &block.name,
                    time: block.hours(self.slot_hours),
                    rwd: &block.rwd,
                },
            )?;
        }
        map.end()
    }
}
