use crate::{BRIDGE_NAMESPACE, IPC_CHANNEL_OPEN_EXTERNAL, IPC_CHANNEL_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOperation {
    pub js_name: &'static str,
    pub channel: &'static str,
    pub command: &'static str,
    pub argument: Option<&'static str>,
}

pub const BRIDGE_OPERATIONS: [BridgeOperation; 2] = [
    BridgeOperation {
        js_name: "version",
        channel: IPC_CHANNEL_VERSION,
        command: "app_version",
        argument: None,
    },
    BridgeOperation {
        js_name: "openExternal",
        channel: IPC_CHANNEL_OPEN_EXTERNAL,
        command: "app_open_external",
        argument: Some("url"),
    },
];

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn operation_source(operation: &BridgeOperation) -> String {
    let command = js_string(operation.command);
    match operation.argument {
        Some(argument) => format!(
            "/* {channel} */ {name}: function ({argument}) {{ return invoke({command}, {{ {argument}: String({argument}) }}); }}",
            channel = operation.channel,
            name = operation.js_name,
        ),
        None => format!(
            "/* {channel} */ {name}: function () {{ return invoke({command}); }}",
            channel = operation.channel,
            name = operation.js_name,
        ),
    }
}

/// Script injected before page code runs. The namespace is frozen and
/// non-configurable so page script can neither replace nor extend it.
pub fn bridge_initialization_script() -> String {
    let namespace = js_string(BRIDGE_NAMESPACE);
    let operations = BRIDGE_OPERATIONS
        .iter()
        .map(operation_source)
        .collect::<Vec<_>>()
        .join(",\n    ");

    format!(
        r#"(function () {{
  if (Object.prototype.hasOwnProperty.call(window, {namespace})) {{
    return;
  }}
  var invoke = function (command, args) {{
    return window.__TAURI_INTERNALS__.invoke(command, args);
  }};
  var bridge = Object.freeze({{
    {operations}
  }});
  Object.defineProperty(window, {namespace}, {{
    value: bridge,
    writable: false,
    configurable: false,
    enumerable: false
  }});
}})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_exposes_exactly_two_operations() {
        let names: Vec<&str> = BRIDGE_OPERATIONS.iter().map(|op| op.js_name).collect();
        assert_eq!(names, vec!["version", "openExternal"]);
    }

    #[test]
    fn bridge_operations_cover_both_ipc_channels() {
        let routes: Vec<(&str, &str)> = BRIDGE_OPERATIONS
            .iter()
            .map(|op| (op.channel, op.command))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("app:version", "app_version"),
                ("app:open-external", "app_open_external")
            ]
        );
    }

    #[test]
    fn bridge_script_freezes_namespace() {
        let script = bridge_initialization_script();
        assert!(script.contains(r#"Object.defineProperty(window, "eastwayDesktop""#));
        assert!(script.contains("Object.freeze("));
        assert!(script.contains("writable: false"));
        assert!(script.contains("configurable: false"));
    }

    #[test]
    fn bridge_script_routes_operations_to_commands() {
        let script = bridge_initialization_script();
        assert!(script.contains(r#"version: function () { return invoke("app_version"); }"#));
        assert!(script.contains(
            r#"openExternal: function (url) { return invoke("app_open_external", { url: String(url) }); }"#
        ));
        assert_eq!(script.matches("invoke(\"").count(), 2);
    }
}
