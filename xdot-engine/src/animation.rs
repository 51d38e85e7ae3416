use std::time::{Duration, Instant};

use tracing::debug;

use crate::transform::ViewState;

/// 三次缓出：`1 - (1 - t)^3`。
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: ViewState,
    pub target: ViewState,
    /// 首次推进时记录，保证动画从宿主的第一帧开始计时。
    pub start: Option<Instant>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating(Transition),
}

/// 视图过渡的状态机，只在宿主调用 `advance` 时前进。
#[derive(Debug, Clone, Default)]
pub struct Animator {
    state: AnimationState,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating(_))
    }

    pub fn target(&self) -> Option<ViewState> {
        match &self.state {
            AnimationState::Animating(transition) => Some(transition.target),
            AnimationState::Idle => None,
        }
    }

    /// 开始新的过渡，正在进行的过渡直接被替换。
    pub fn start(&mut self, from: ViewState, target: ViewState, duration: Duration) {
        if self.is_animating() {
            debug!("覆盖进行中的视图动画");
        }
        debug!(
            from_zoom = from.zoom,
            target_zoom = target.zoom,
            duration_ms = duration.as_millis() as u64,
            "开始视图动画"
        );
        self.state = AnimationState::Animating(Transition {
            from,
            target,
            start: None,
            duration,
        });
    }

    /// 停止动画，返回之前是否在动画中。
    pub fn cancel(&mut self) -> bool {
        let was_animating = self.is_animating();
        if was_animating {
            debug!("视图动画已取消");
        }
        self.state = AnimationState::Idle;
        was_animating
    }

    /// 推进到 `now`，返回该时刻的视图；空闲时返回 `None`。
    ///
    /// 到达时长后精确落在目标视图并回到空闲状态。
    pub fn advance(&mut self, now: Instant) -> Option<ViewState> {
        let AnimationState::Animating(transition) = &mut self.state else {
            return None;
        };
        let start = *transition.start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= transition.duration {
            let target = transition.target;
            self.state = AnimationState::Idle;
            debug!(zoom = target.zoom, "视图动画结束");
            return Some(target);
        }
        let t = elapsed.as_secs_f64() / transition.duration.as_secs_f64();
        Some(transition.from.lerp(transition.target, ease_out_cubic(t)))
    }
}
