//! Workspace test member — decode and CFG-construction tests,
//! grouped per area.
