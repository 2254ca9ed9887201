//! Hand-maintained support declarations the generated files lean on.

/// Static base declarations written alongside the generated files.
///
/// These cover the pieces no XML reference describes: the numeric aliases,
/// project-derived name unions, and the typed signal plumbing.
pub fn base_definitions() -> &'static str {
    r#"declare type int = number;
declare type float = number;

/** Path arguments accepted by get_node(). */
declare type NodePathType = string;

/** Input action names defined in the project settings. */
declare type Action = string;

/** Scene file names known to the project. */
declare type SceneName = string;

/** Node groups declared in scenes, keyed by group name. */
declare interface Groups {
    [name: string]: Node;
}

/** The signal-valued property names of T, without the $ prefix. */
declare type SignalsOf<T> = {
    [K in keyof T]: T[K] extends Signal<any> ? K : never;
}[keyof T];

/** Extracts the handler type carried by a signal-valued property. */
declare type SignalFunction<T> = T extends Signal<infer U> ? U : never;

declare class Signal<T extends (...args: any[]) => any> {
    /** Emits this signal, invoking connected handlers with args. */
    emit(...args: Parameters<T>): void;
    connect(handler: T): number;
    disconnect(handler: T): void;
}

declare interface Dictionary {
    [key: string]: any;
}

declare class PackedScene<T extends Node = Node> {
    instance(): T;
}
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_definitions_cover_the_support_types() {
        let defs = base_definitions();
        for needed in [
            "declare type int",
            "declare type NodePathType",
            "declare interface Groups",
            "declare type SignalsOf",
            "declare type SignalFunction",
            "declare class Signal",
        ] {
            assert!(defs.contains(needed), "missing {needed}");
        }
    }
}
