//! Section metadata the console UI uses to lay out the config editor.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfigSection {
    pub key: &'static str,
    pub label: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfigSchema {
    pub sections: &'static [ConfigSection],
}

pub const CONFIG_SECTIONS: &[ConfigSection] = &[
    ConfigSection {
        key: "gateway",
        label: "网关",
        fields: &["port", "reload"],
    },
    ConfigSection {
        key: "agents",
        label: "智能体",
        fields: &["defaults", "list", "bindings"],
    },
    ConfigSection {
        key: "channels",
        label: "渠道",
        fields: &["whatsapp", "telegram", "discord"],
    },
    ConfigSection {
        key: "session",
        label: "会话",
        fields: &["dmScope", "reset"],
    },
    ConfigSection {
        key: "tools",
        label: "工具与自动化",
        fields: &["tools", "cron", "hooks"],
    },
];

pub fn config_schema() -> ConfigSchema {
    ConfigSchema {
        sections: CONFIG_SECTIONS,
    }
}
