use std::collections::HashMap;

use xdot_core::graph::{EdgeKey, ElementKey};

use crate::scene::Scene;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub scene: &'a mut Scene,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(ZoomToFitCommand);
        bus.register(ZoomInCommand);
        bus.register(ZoomOutCommand);
        bus.register(HaltAnimationCommand);
        bus.register(JumpToCommand);
        bus.register(FindCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    pub fn available_commands(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// `a` 表示节点，`a->b` 表示边，`a->b:label` 表示带标签的边。
pub fn parse_element_key(text: &str) -> Option<ElementKey> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let Some((tail, rest)) = text.split_once("->") else {
        return Some(ElementKey::Node(text.to_string()));
    };
    let (head, label) = match rest.split_once(':') {
        Some((head, label)) => (head, Some(label.trim())),
        None => (rest, None),
    };
    let (tail, head) = (tail.trim(), head.trim());
    if tail.is_empty() || head.is_empty() {
        return None;
    }
    let mut key = EdgeKey::new(tail, head);
    if let Some(label) = label {
        key = key.with_label(label);
    }
    Some(ElementKey::Edge(key))
}

struct ZoomToFitCommand;

impl CommandHandler for ZoomToFitCommand {
    fn name(&self) -> &'static str {
        "zoom_to_fit"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let viewport = context.scene.viewport();
        context.scene.zoom_to_fit(viewport);
        CommandResponse::ok("视图已缩放到整图")
    }
}

struct ZoomInCommand;

impl CommandHandler for ZoomInCommand {
    fn name(&self) -> &'static str {
        "zoom_in"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.zoom_in(None);
        CommandResponse::ok(format!("缩放: {:.3}", context.scene.view().zoom))
    }
}

struct ZoomOutCommand;

impl CommandHandler for ZoomOutCommand {
    fn name(&self) -> &'static str {
        "zoom_out"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.zoom_out(None);
        CommandResponse::ok(format!("缩放: {:.3}", context.scene.view().zoom))
    }
}

struct HaltAnimationCommand;

impl CommandHandler for HaltAnimationCommand {
    fn name(&self) -> &'static str {
        "halt_animation"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if context.scene.halt_animation() {
            CommandResponse::ok("动画已停止")
        } else {
            CommandResponse::ok("当前没有动画")
        }
    }
}

struct JumpToCommand;

impl CommandHandler for JumpToCommand {
    fn name(&self) -> &'static str {
        "jump_to"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some(key) = request.args.first().and_then(|arg| parse_element_key(arg)) else {
            return CommandResponse::err("用法: jump_to <节点> | <尾->头[:标签]>");
        };
        match context.scene.jump_to(&key) {
            Ok(()) => CommandResponse::ok(format!("跳转到 {key}")),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct FindCommand;

impl CommandHandler for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some(pattern) = request.args.first() else {
            return CommandResponse::err("用法: find <正则>");
        };
        match context.scene.find(pattern) {
            Ok(found) if found.is_empty() => CommandResponse::ok("没有匹配的元素"),
            Ok(found) => {
                let names: Vec<String> = found.iter().map(ToString::to_string).collect();
                CommandResponse::ok(format!("找到 {} 个: {}", found.len(), names.join(", ")))
            }
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}
