#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Writes `contents` to a temporary `.json` file that lives as long as the
/// returned handle.
pub fn plan_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("create temp plan");
    file.write_all(contents.as_bytes()).expect("write temp plan");
    file
}

pub const ORDERS_PLAN: &str = r#"{
    "migration": {
        "timestamp": "2024-05-01T08:00:00",
        "module": "orders",
        "tag": "initial"
    },
    "changes": [
        {
            "CreateTable": {
                "table": "Orders",
                "columns": [
                    {
                        "name": "Id",
                        "kind": {"tag": "Int32"},
                        "primary_key": true,
                        "identity": true
                    },
                    {
                        "name": "Reference",
                        "kind": {"tag": "String", "size": 40},
                        "nullable": false,
                        "unique_group": "reference"
                    },
                    {
                        "name": "PlacedAt",
                        "kind": {"tag": "DateTime"},
                        "nullable": false,
                        "default": {"Sentinel": "CurrentDateTime"}
                    }
                ]
            }
        },
        {
            "AddIndex": {
                "table": "Orders",
                "columns": ["PlacedAt"]
            }
        },
        {
            "AlterColumn": {
                "table": "Orders",
                "column": {
                    "name": "Reference",
                    "kind": {"tag": "String", "size": 80},
                    "nullable": false,
                    "default": {"Literal": {"Text": "n/a"}}
                }
            }
        }
    ]
}"#;
