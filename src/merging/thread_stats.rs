// Thread counters: plain sums, with "never reported" kept apart from zero.

use crate::models::{ThreadInfoAggregate, ThreadStats};

pub fn merge_thread_stats<'a, I>(stats: I) -> ThreadInfoAggregate
where
    I: IntoIterator<Item = &'a ThreadStats>,
{
    let mut out = ThreadInfoAggregate::default();
    for s in stats {
        add(&mut out.total_cpu_micros, s.cpu_micros);
        add(&mut out.total_blocked_micros, s.blocked_micros);
        add(&mut out.total_waited_micros, s.waited_micros);
        add(&mut out.total_allocated_kbytes, s.allocated_kbytes);
    }
    out
}

fn add(total: &mut Option<u64>, value: Option<u64>) {
    if let Some(v) = value {
        *total = Some(total.unwrap_or(0).saturating_add(v));
    }
}
