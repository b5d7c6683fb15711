// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};

/// 标识长度（十六进制字符数）
pub const ID_LEN: usize = 16;

/// 身份哈希器
///
/// 对规范地址的 UTF-8 字节做 SHA-256，取前 16 个十六进制字符。
/// 短摘要存在碰撞可能，不做额外处理。
pub struct IdentityHasher;

impl IdentityHasher {
    pub fn id(url: &str) -> String {
        let digest = Sha256::digest(url.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(ID_LEN);
        encoded
    }
}
